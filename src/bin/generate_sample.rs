use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

const FIRST_NAMES: [&str; 12] = [
    "Johann", "Arielle", "Jonathan", "Emmanuel", "Guillaume", "Katie", "Joseph", "Paul",
    "Tommy", "Sarah", "Amelia", "Mahmoud",
];
const LAST_NAMES: [&str; 8] = [
    "Kenitz", "Nuelle", "Peter", "Turing", "Plessis", "Shirking", "Crocker", "Schneider",
];
const FIELDS: [&str; 4] = ["CS", "SWE", "Math", "Physics"];

#[derive(Parser)]
#[command(name = "generate_sample")]
#[command(about = "Write a deterministic sample roster CSV")]
struct Args {
    /// Output path
    #[arg(default_value = "sample_roster.csv")]
    output: PathBuf,

    /// Number of student rows
    #[arg(short, long, default_value_t = 10)]
    students: usize,

    /// PRNG seed
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn below(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[self.below(items.len())]
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::init();

    let mut rng = SimpleRng::new(args.seed);
    let mut writer = csv::Writer::from_path(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;

    writer.write_record(["firstname", "lastname", "age", "field"])?;
    for _ in 0..args.students {
        let age = (18 + rng.below(30)).to_string();
        writer.write_record([
            rng.pick(&FIRST_NAMES),
            rng.pick(&LAST_NAMES),
            age.as_str(),
            rng.pick(&FIELDS),
        ])?;
    }
    writer.flush().context("flushing roster")?;

    log::info!("seed {}", args.seed);
    println!("Wrote {} students to {}", args.students, args.output.display());
    Ok(())
}
