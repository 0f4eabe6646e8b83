use clap::Parser;
use warforge_lib::model::checksum::verify_world;
use warforge_lib::model::pipeline::{generate, GenerationRequest, Seed};

#[derive(Parser, Debug)]
#[command(author, version, about = "Check that a seed reproduces identically", long_about = None)]
struct Args {
    #[arg(short, long)]
    seed: String,

    #[arg(long, default_value_t = 64)]
    width: u32,

    #[arg(long, default_value_t = 64)]
    height: u32,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    println!("Verifying seed {}...", args.seed);

    let request = GenerationRequest {
        seed: Some(Seed::Text(args.seed.clone())),
        width: args.width,
        height: args.height,
        ..GenerationRequest::default()
    };

    // 1. Two independent generations
    let first = generate(&request)?;
    let second = generate(&request)?;
    println!("First checksum:  {}", first.metadata.checksum);
    println!("Second checksum: {}", second.metadata.checksum);

    // 2. World content matches its recorded digest
    let world_ok = verify_world(&first.world)?;
    let same = first.metadata.checksum == second.metadata.checksum;

    if same && world_ok {
        println!("\n✅ VERIFICATION SUCCESSFUL!");
        println!("Entities: {}", first.metadata.entity_count);
        println!("POIs: {}", first.metadata.poi_count);
        Ok(())
    } else {
        println!("\n❌ VERIFICATION FAILED!");
        if !same {
            println!("The two generations diverged.");
        }
        if !world_ok {
            println!("The world content does not match its checksum.");
        }
        anyhow::bail!("seed {} is not reproducible", args.seed)
    }
}
