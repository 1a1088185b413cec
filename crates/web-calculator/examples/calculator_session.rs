//! Calculator Session Demo
//!
//! Drives the mock-DOM calculator through a scripted session and prints what
//! the page would show after each step.
//!
//! Run with: cargo run --example calculator_session
//! Set `RUST_LOG=web_calculator=debug` to see state transitions.

use tracing_subscriber::EnvFilter;
use web_calculator::config::CalculatorConfig;
use web_calculator::driver::{run_all_scenarios, CalculatorDriver, HeadlessDriver};
use web_calculator::wasm::WasmDriver;

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("web_calculator=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn show(driver: &WasmDriver, step: &str) {
    let snapshot = driver.snapshot();
    println!(
        "   {step:<14} │ {:>16} │ {:<18} │ {:?}{}",
        driver.previous_display(),
        driver.current_display(),
        snapshot.phase,
        if driver.is_flashing() { " ✨" } else { "" }
    );
}

fn main() {
    init_tracing();

    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║            Web Calculator - Mock DOM Session                 ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    let config = match std::env::var("CALC_CONFIG") {
        Ok(json) => match CalculatorConfig::from_json(&json) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("Ignoring CALC_CONFIG: {err}");
                CalculatorConfig::default()
            }
        },
        Err(_) => CalculatorConfig::default(),
    };
    let mut driver = WasmDriver::with_config(config);

    println!("   {:<14} │ {:>16} │ {:<18} │ phase", "keys", "previous", "current");
    println!("   {}", "─".repeat(66));
    show(&driver, "(start)");

    let steps = [
        "1234567", "+", "8", "=", "C", "0.1+0.2=", "50%", "9/0=",
    ];
    for keys in steps {
        if keys == "C" {
            driver.click("btn-clear");
        } else {
            driver.enter(keys);
        }
        show(&driver, keys);
    }

    driver.advance_ms(1000);
    show(&driver, "+1000ms");
    driver.advance_ms(1000);
    show(&driver, "+2000ms");

    println!();
    println!("📜 DOM events recorded: {}", driver.dom().event_history().len());

    println!();
    println!("🔁 Running scenario suite on both drivers...");
    run_all_scenarios(&mut HeadlessDriver::new());
    println!("   ✅ HeadlessDriver");
    run_all_scenarios(&mut WasmDriver::new());
    println!("   ✅ WasmDriver");
}
