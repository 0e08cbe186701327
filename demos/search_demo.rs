use powswarm::{NoncePartition, SearchConfigBuilder};
use std::io::Write;
use std::str::FromStr;

fn usage() -> String {
    "Usage: cargo run --release --example search_demo -- \
      [--difficulty <u32>] [--workers <usize>] \
      [--partition <stride|spread>] [--input <str>]\n"
        .to_string()
}

fn parse_next<T: FromStr>(it: &mut impl Iterator<Item = String>, flag: &str) -> Result<T, String> {
    let v = it.next().ok_or_else(|| usage())?;
    v.parse::<T>().map_err(|_| format!("Invalid {flag}"))
}

fn main() -> Result<(), String> {
    let mut args = std::env::args().skip(1);
    let mut difficulty: u32 = powswarm::DEFAULT_DIFFICULTY;
    let mut workers: Option<usize> = None;
    let mut partition = NoncePartition::Stride;
    let mut input: Option<String> = None;

    while let Some(a) = args.next() {
        match a.as_str() {
            "--difficulty" => difficulty = parse_next(&mut args, "--difficulty")?,
            "--workers" => workers = Some(parse_next(&mut args, "--workers")?),
            "--partition" => {
                let v = args.next().ok_or_else(|| usage())?;
                partition = match v.as_str() {
                    "stride" => NoncePartition::Stride,
                    "spread" => NoncePartition::Spread,
                    _ => return Err(usage()),
                };
            }
            "--input" => input = Some(args.next().ok_or_else(|| usage())?),
            _ => return Err(usage()),
        }
    }

    let default_workers = std::thread::available_parallelism()
        .map(|nz| nz.get())
        .unwrap_or(1)
        .saturating_sub(1)
        .max(1);
    let workers = workers.unwrap_or(default_workers);

    println!("Diff  {difficulty}");
    let input = if let Some(input) = input {
        input
    } else {
        print!("Enter ");
        std::io::stdout().flush().map_err(|e| e.to_string())?;
        let mut line = String::new();
        std::io::stdin()
            .read_line(&mut line)
            .map_err(|e| e.to_string())?;
        line.trim_end().to_string()
    };

    let config = SearchConfigBuilder::default()
        .difficulty(difficulty)
        .workers(workers)
        .partition(partition)
        .build_validated()
        .map_err(|e| e.to_string())?;
    let (solution, stats) =
        powswarm::search_with_stats(input.as_bytes(), &config).map_err(|e| e.to_string())?;

    println!("Time -  {}s", solution.elapsed.as_secs_f64());
    println!(
        "Hash({} + {}) = {}",
        input,
        solution.nonce,
        solution.digest_hex()
    );
    println!("candidate={}", solution.candidate_lossy());
    println!(
        "workers={}, attempts={}, submissions={}",
        stats.workers, stats.total_attempts, stats.total_submissions
    );
    Ok(())
}
