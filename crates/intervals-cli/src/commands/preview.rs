use clap::Args;
use intervals_core::error::Result;
use intervals_core::DisplayTime;

#[derive(Args)]
pub struct PreviewArgs {
    /// Length of the phase in milliseconds
    #[arg(long)]
    pub total_ms: u64,
    /// Time already spent in the phase in milliseconds
    #[arg(long)]
    pub elapsed_ms: u64,
}

pub fn run(args: PreviewArgs) -> Result<()> {
    let display = DisplayTime::derive(args.elapsed_ms, args.total_ms);
    let out = serde_json::json!({
        "text": display.text(),
        "remaining_ms": display.remaining_ms,
        "remaining_secs": display.remaining_secs,
        "progress": display.progress,
        "arc_degrees": display.arc_degrees(),
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}
