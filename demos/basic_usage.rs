// demos/basic_usage.rs
//! Basic usage example for the ADC signal chain

use adc_sim::ConfigLoader;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("ADC Sim Basic Usage Example");
    println!("===========================");

    // Load configuration
    println!("Loading configuration...");
    let loader = ConfigLoader::new();
    let config = loader.load()?;
    println!("Configuration loaded successfully");
    println!("  - Samples: {} over {} s", config.adc.sample_count, config.adc.duration_s);
    println!("  - Resolution: {} bits, Vref {} V", config.adc.resolution_bits, config.adc.reference_voltage);
    println!("  - Filter alpha: {}", config.adc.alpha);
    println!("  - Noise sigma: {} V", config.adc.noise_std_dev);
    println!("  - Seed: {:?}", config.run.seed);

    let pipeline = loader.load_pipeline()?;

    println!("\nRunning pipeline...");
    let start_time = std::time::Instant::now();
    let output = pipeline.run();
    println!("Processed {} samples in {:?}", output.len(), start_time.elapsed());

    println!("\nFirst samples:");
    println!("{:>8} {:>10} {:>10} {:>10} {:>6}", "t (s)", "noisy", "filtered", "quantized", "code");
    for row in output.rows().take(10) {
        println!(
            "{:>8.4} {:>10.4} {:>10.4} {:>10.4} {:>6}",
            row.time_s, row.noisy_v, row.filtered_v, row.reconstructed_v, row.code
        );
    }

    let quality = output.quality();
    println!("\nQuality:");
    println!("  - LSB: {:.6} V", quality.quantization_step_v);
    println!("  - RMS quantization error: {:.6} V", quality.rms_quantization_error_v);
    println!("  - Input SNR: {:.2} dB", quality.input_snr_db);
    println!("  - Output SNR: {:.2} dB", quality.output_snr_db);
    println!("  - Saturated samples: {}", quality.saturated());

    Ok(())
}
