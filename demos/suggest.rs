//! Suggest chunk shapes for a variable, e.g.
//!
//! ```text
//! cargo run --example suggest -- 8784,2600,2600 time,lat,lon
//! ```

use std::env;

use rekx::{Constraints, Result, RechunkPlan, Strategy, VariableShape};

fn main() -> Result<()> {
    let mut args = env::args().skip(1);
    let variable: VariableShape = args.next().as_deref().unwrap_or("8784,2600,2600").parse()?;
    let names = args.next().unwrap_or_else(|| "time,lat,lon".into());
    let names: Vec<&str> = names.split(',').collect();

    let mut constraints = Constraints::new();
    constraints.force_power_of_two(true).default_spatial_divisors();

    println!("variable shape: {}", variable);
    for strategy in Strategy::ALL {
        // default sizing: 4-byte elements, 4 KiB chunks
        let chunk = variable.chunking().strategy(strategy).constraints(&constraints).solve();
        match chunk {
            Ok(chunk) => {
                let count = chunk.count(&variable)?;
                println!("{:>12}: {} ({} chunks)", strategy, chunk, count);
                if let Ok(plan) = RechunkPlan::new(&names, chunk) {
                    println!("{:>12}  nccopy -c {}", "", plan);
                }
            }
            Err(err) => println!("{:>12}: {}", strategy, err),
        }
    }

    Ok(())
}
