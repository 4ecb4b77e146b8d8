//! Evaluate a branch predictor against one or more text traces.

use bpred::*;
use bpred::stats::*;
use bpred::trace::*;
use clap::Parser;
use std::process;

#[derive(Parser, Debug)]
#[command(name = "evaluate", about = "Evaluate a branch predictor against text traces")]
struct Args {
    /// Trace files ('<pc> <outcome>' per line)
    #[arg(required = true)]
    traces: Vec<String>,

    /// Prediction strategy
    #[arg(short, long, value_enum, default_value_t = Strategy::Static)]
    predictor: Strategy,

    /// Width of the global history register
    #[arg(long, default_value_t = defaults::GHISTORY_BITS)]
    ghistory: usize,

    /// Width of the local history
    #[arg(long, default_value_t = defaults::LHISTORY_BITS)]
    lhistory: usize,

    /// Width of the per-address index
    #[arg(long, default_value_t = defaults::PC_INDEX_BITS)]
    pc_index: usize,

    /// JSON configuration file (overrides the options above)
    #[arg(short, long)]
    config: Option<String>,

    /// Print the branches with the most mispredictions
    #[arg(short, long, default_value_t = 0)]
    worst: usize,
}

fn load_config(args: &Args) -> Result<PredictorConfig, Box<dyn std::error::Error>> {
    if let Some(path) = &args.config {
        let text = std::fs::read_to_string(path)?;
        return Ok(PredictorConfig::from_json(&text)?);
    }
    Ok(PredictorConfig {
        strategy: args.predictor,
        ghistory_bits: args.ghistory,
        lhistory_bits: args.lhistory,
        pc_index_bits: args.pc_index,
        ..PredictorConfig::default()
    })
}

fn run_test(records: &[BranchRecord], p: &mut impl BranchPredictor) -> BranchStats {
    let mut stat = BranchStats::new();
    for record in records {
        let prediction = p.predict(record.pc);
        stat.update(record, prediction);
        p.train(record.pc, record.outcome);
    }
    stat
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let cfg = match load_config(&args) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(1);
        },
    };
    let mut predictor = match cfg.build() {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(1);
        },
    };

    for path in &args.traces {
        let trace = match TextTrace::from_file(path) {
            Ok(trace) => trace,
            Err(e) => {
                eprintln!("error: {}: {}", path, e);
                process::exit(1);
            },
        };

        predictor.reset();
        let stat = run_test(trace.as_slice(), &mut predictor);

        println!("[*] {}, {} records", trace.name(), trace.num_entries());
        println!("  {:12} Global hit rate: {}/{} ({:.2}% correct) ({} misses)",
            predictor.name(),
            stat.global_hits(),
            stat.global_brns(),
            stat.hit_rate() * 100.0,
            stat.global_miss()
        );
        println!("  Misprediction rate: {:.3}%", stat.miss_rate());
        println!("  Unique branches: {} ({} always taken, {} never taken)",
            stat.num_unique_branches(),
            stat.num_always_taken(),
            stat.num_never_taken()
        );

        if args.worst > 0 {
            println!("  Most mispredicted branches:");
            for (pc, data) in stat.get_worst_branches(args.worst, 1) {
                println!("    {:08x} {:8}/{:8} {:.4}",
                    pc, data.hits, data.occ, data.hit_rate()
                );
            }
        }
    }
}
