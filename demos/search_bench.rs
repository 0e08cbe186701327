use powswarm::{NoncePartition, SearchConfigBuilder};
use std::str::FromStr;

fn usage() -> String {
    "Usage: cargo run --release --example search_bench -- \
      [--difficulty <u32>] [--workers-list <csv>] \
      [--partition <stride|spread>] [--data <str>] [--repeats <u32>]\n"
        .to_string()
}

fn parse_next<T: FromStr>(it: &mut impl Iterator<Item = String>, flag: &str) -> Result<T, String> {
    let v = it.next().ok_or_else(|| usage())?;
    v.parse::<T>().map_err(|_| format!("Invalid {flag}"))
}

fn main() -> Result<(), String> {
    let mut args = std::env::args().skip(1);
    let mut difficulty: u32 = 4;
    let mut workers_list: Option<Vec<usize>> = None;
    let mut partition = NoncePartition::Stride;
    let mut data = String::from("hello");
    let mut repeats: u32 = 1;

    while let Some(a) = args.next() {
        match a.as_str() {
            "--difficulty" => difficulty = parse_next(&mut args, "--difficulty")?,
            "--workers-list" => {
                let raw = args.next().ok_or_else(|| usage())?;
                let list = raw
                    .split(',')
                    .filter(|s| !s.is_empty())
                    .map(|s| s.parse::<usize>().map_err(|_| usage()))
                    .collect::<Result<Vec<_>, _>>()?;
                if list.is_empty() {
                    return Err(usage());
                }
                workers_list = Some(list);
            }
            "--partition" => {
                let v = args.next().ok_or_else(|| usage())?;
                partition = match v.as_str() {
                    "stride" => NoncePartition::Stride,
                    "spread" => NoncePartition::Spread,
                    _ => return Err(usage()),
                };
            }
            "--data" => data = args.next().ok_or_else(|| usage())?,
            "--repeats" => repeats = parse_next(&mut args, "--repeats")?,
            _ => return Err(usage()),
        }
    }

    let default_workers = std::thread::available_parallelism()
        .map(|nz| nz.get())
        .unwrap_or(1)
        .saturating_sub(1)
        .max(1);
    let run_workers: Vec<usize> = workers_list.unwrap_or_else(|| vec![default_workers]);

    println!(
        "difficulty={}, partition={:?}, data_len={}, workers_list={:?}, repeats={}",
        difficulty,
        partition,
        data.len(),
        run_workers,
        repeats
    );
    println!("kind,difficulty,workers,repeat_idx,time_ms,attempts,attempts_per_s,nonce");

    for w in run_workers {
        // accumulators for per-workers summary across repeats
        let mut times_ms: Vec<u128> = Vec::with_capacity(repeats as usize);
        let mut rates: Vec<f64> = Vec::with_capacity(repeats as usize);

        for rep in 0..repeats {
            let config = SearchConfigBuilder::default()
                .difficulty(difficulty)
                .workers(w)
                .partition(partition)
                .build_validated()
                .map_err(|e| e.to_string())?;
            let (solution, stats) = powswarm::search_with_stats(data.as_bytes(), &config)
                .map_err(|e| e.to_string())?;
            let dt_ms = solution.elapsed.as_millis();
            let rate = (stats.total_attempts as f64) / solution.elapsed.as_secs_f64().max(1e-9);
            let rate_s = format!("{:.3}", rate);
            println!(
                "run,{},{},{},{},{},{},{}",
                difficulty, w, rep, dt_ms, stats.total_attempts, rate_s, solution.nonce
            );
            times_ms.push(dt_ms);
            rates.push(rate);
        }

        // summary per workers value
        fn summarize_f64(xs: &[f64]) -> (f64, f64) {
            let n = xs.len() as f64;
            let sum: f64 = xs.iter().sum();
            let mean = sum / n;
            let sumsq: f64 = xs.iter().map(|v| v * v).sum();
            let var = if xs.len() > 1 {
                (sumsq - sum * sum / n) / (n - 1.0)
            } else {
                0.0
            };
            (mean, var.max(0.0).sqrt())
        }
        fn summarize_u128(xs: &[u128]) -> (f64, f64) {
            summarize_f64(&xs.iter().map(|&v| v as f64).collect::<Vec<_>>())
        }
        let (mt, st) = summarize_u128(&times_ms);
        let (mr, sr) = summarize_f64(&rates);
        println!("kind,difficulty,workers,mean_time_ms,std_time_ms,mean_attempts_per_s,std_attempts_per_s");
        println!(
            "summary,{},{},{},{},{},{}",
            difficulty,
            w,
            format!("{:.3}", mt),
            format!("{:.3}", st),
            format!("{:.3}", mr),
            format!("{:.3}", sr)
        );
    }
    Ok(())
}
