use clap::Parser;
use datecycle::AlarmSchedule;
use jiff::Zoned;
use std::io::Read;
use std::process;

#[derive(Parser)]
#[command(name = "datecycle", about = "Date-cycle engine for recurring alarms", version)]
struct Cli {
    /// Alarm schedule as JSON, or "-" to read from stdin
    schedule: Option<String>,

    /// Number of occurrences to show
    #[arg(short, long, default_value = "1")]
    n: u32,

    /// Reference instant (default: now), e.g. 2026-03-03T12:00:00[America/New_York]
    #[arg(long)]
    from: Option<String>,

    /// Output as JSON
    #[arg(long)]
    json: bool,

    /// Validate the schedule without computing
    #[arg(long)]
    check: bool,
}

fn main() {
    let cli = Cli::parse();

    let raw = match cli.schedule {
        Some(ref s) if s == "-" => {
            let mut buf = String::new();
            if let Err(e) = std::io::stdin().read_to_string(&mut buf) {
                eprintln!("error: failed to read stdin: {e}");
                process::exit(2);
            }
            buf
        }
        Some(ref s) => s.clone(),
        None => {
            eprintln!("error: no schedule provided");
            process::exit(2);
        }
    };

    let schedule: AlarmSchedule = match serde_json::from_str(&raw) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: invalid schedule JSON: {e}");
            process::exit(1);
        }
    };

    if let Err(e) = schedule.validate() {
        eprintln!("error: {e}");
        process::exit(1);
    }

    if cli.check {
        println!("\u{2713} valid: {schedule}");
        process::exit(0);
    }

    let from = match cli.from {
        Some(ref s) => match s.parse::<Zoned>() {
            Ok(z) => z,
            Err(e) => {
                eprintln!("error: invalid --from instant: {e}");
                process::exit(2);
            }
        },
        None => Zoned::now(),
    };

    let mut n = cli.n;
    if n > 1000 {
        eprintln!("warning: capped at 1000 occurrences");
        n = 1000;
    }

    let results = match schedule.next_fires(&from, n as usize) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    };

    if cli.json {
        let iso_strings: Vec<String> = results.iter().map(|z| z.to_string()).collect();
        println!("{}", serde_json::to_string(&iso_strings).unwrap());
    } else {
        for z in &results {
            println!("{z}");
        }
    }
}
