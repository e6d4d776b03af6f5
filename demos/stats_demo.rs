use clap::Parser;
use probe_hash::HashMap;

#[derive(Parser, Debug)]
struct Args {
    #[arg(short = 'c', long = "target_capacity", default_value_t = 1000)]
    target_capacity: usize,

    /// Percentage of keys removed and replaced after the initial fill.
    #[arg(short = 'r', long = "churn_percent", default_value_t = 25)]
    churn_percent: usize,
}

fn print_histogram(hist: &[usize]) {
    let total: usize = hist.iter().sum();
    println!("Probe length histogram ({total} entries):");
    for (distance, &count) in hist.iter().enumerate() {
        if count == 0 {
            continue;
        }
        println!(
            "  {distance:>3}: {count:>8} ({:.02}%)",
            count as f64 / total as f64 * 100.0
        );
    }
}

fn main() -> Result<(), probe_hash::Error> {
    let args = Args::parse();

    println!(
        "Creating HashMap with target capacity: {}",
        args.target_capacity
    );

    let mut map: HashMap<String, u64> = HashMap::with_capacity(args.target_capacity)?;
    let initial_capacity = map.capacity();
    println!("Actual capacity: {initial_capacity}");

    for i in 0..initial_capacity as u64 {
        map.insert(format!("key-{i}"), i)?;
    }
    println!(
        "Inserted {} keys, capacity grew {} -> {}",
        map.len(),
        initial_capacity,
        map.capacity()
    );

    let churn = map.len() * args.churn_percent.min(100) / 100;
    for i in 0..churn as u64 {
        map.remove(format!("key-{i}").as_str());
    }
    let stats = map.debug_stats();
    println!(
        "Removed {churn} keys, leaving {} tombstones",
        stats.tombstones
    );

    let next = initial_capacity as u64;
    for i in next..next + churn as u64 {
        map.insert(format!("key-{i}"), i)?;
    }
    println!("Reinserted {churn} fresh keys");

    print_histogram(&map.probe_histogram());
    map.debug_stats().print();
    Ok(())
}
