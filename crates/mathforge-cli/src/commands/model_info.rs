//! The `mathforge model-info` command: pretrain the statistical policy and
//! print its observability block.

use anyhow::Result;

use mathforge_core::{AdaptationPolicy, ModelPolicy};

pub fn execute() -> Result<()> {
    let policy = ModelPolicy::new();
    let info = policy.model_info();

    println!("Adaptation model");
    println!("  kind:             {}", info.kind);
    println!("  predictions made: {}", info.predictions_made);
    match info.last_confidence {
        Some(c) => println!("  last confidence:  {:.1}%", c * 100.0),
        None => println!("  last confidence:  n/a"),
    }

    Ok(())
}
