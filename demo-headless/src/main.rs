use chrono::{DateTime, NaiveDate, Utc};
use clap::Parser;
use windward_core::weather::synthetic::{regular_axis, synthetic_ensemble};
use windward_core::{
    find_optimal_route, simulate, summarize, summarize_ensemble, Hours, LatLon, Leg, Passage,
    PolarConfig, RhumblineNavigator, RouteError, Vec2,
};

/// Passage planning demo on a synthetic forecast ensemble
#[derive(Parser, Debug)]
#[command(name = "windward-demo")]
#[command(about = "Ocean passage planning demo with synthetic forecasts", long_about = None)]
struct Args {
    /// Start position as "lat,lon" in degrees
    #[arg(long, default_value = "36.63,-121.90")]
    start: String,

    /// Destination as "lat,lon" in degrees
    #[arg(long, default_value = "19.79,-154.76")]
    end: String,

    /// Departure date (YYYY-MM-DD, UTC midnight); defaults to now
    #[arg(long)]
    start_date: Option<String>,

    /// Number of synthetic ensemble members
    #[arg(short, long, default_value_t = 5)]
    members: usize,

    /// Candidate resolution for the route search
    #[arg(short, long, default_value_t = 20)]
    resolution: u32,

    /// Seed for the synthetic forecast ensemble
    #[arg(long, default_value_t = 7)]
    seed: u64,

    /// Forecast spacing in hours
    #[arg(long, default_value_t = 6.0)]
    step_hours: f64,

    /// Forecast horizon in days
    #[arg(long, default_value_t = 45)]
    horizon_days: u32,

    /// Prevailing wind as "u,v" components in knots
    #[arg(long, default_value = "14.0,-4.0")]
    base_wind: String,

    /// Member-to-member variability around the prevailing wind, knots
    #[arg(long, default_value_t = 5.0)]
    variability: f64,

    /// Search for a single-deviation route instead of sailing direct
    #[arg(short, long)]
    optimal: bool,
}

fn parse_pair(text: &str, what: &str) -> Result<(f64, f64), String> {
    let mut parts = text.split(',');
    let (Some(a), Some(b), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(format!("{what}: expected two comma-separated numbers, got '{text}'"));
    };
    let a = a
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("{what}: {e}"))?;
    let b = b
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("{what}: {e}"))?;
    Ok((a, b))
}

fn parse_start_time(arg: Option<&str>) -> Result<DateTime<Utc>, String> {
    let Some(text) = arg else {
        return Ok(Utc::now());
    };
    let date = NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .map_err(|e| format!("start date '{text}': {e}"))?;
    Ok(date.and_hms_opt(0, 0, 0).map_or_else(Utc::now, |dt| dt.and_utc()))
}

fn run(args: &Args) -> Result<(), String> {
    let (start_lat, start_lon) = parse_pair(&args.start, "start")?;
    let (end_lat, end_lon) = parse_pair(&args.end, "end")?;
    let (base_u, base_v) = parse_pair(&args.base_wind, "base wind")?;
    let start = LatLon::new(start_lat, start_lon);
    let end = LatLon::new(end_lat, end_lon);
    let departure = parse_start_time(args.start_date.as_deref())?;

    let polar = PolarConfig::default();
    let nav = RhumblineNavigator;

    let steps = (f64::from(args.horizon_days) * 24.0 / args.step_hours).ceil() as usize + 1;
    let axis = regular_axis(departure, Hours::new(args.step_hours), steps);
    let ensemble = synthetic_ensemble(
        args.seed,
        args.members,
        Vec2::new(base_u, base_v),
        args.variability,
        &axis,
    )
    .map_err(|e| e.to_string())?;

    println!("=== Windward Passage Demo ===\n");
    println!(
        "{} member synthetic ensemble, {} h spacing, {} day horizon, seed {}",
        args.members, args.step_hours, args.horizon_days, args.seed
    );

    let waypoints = if args.optimal {
        match find_optimal_route(
            start,
            end,
            departure,
            &ensemble,
            args.resolution,
            &polar,
            &nav,
        ) {
            Ok(via) => {
                println!("selected deviation waypoint: {via}");
                vec![start, via, end]
            }
            Err(RouteError::NoFeasibleRoute) => {
                println!("no safe deviation found, sailing the direct route");
                vec![start, end]
            }
            Err(e) => return Err(e.to_string()),
        }
    } else {
        vec![start, end]
    };

    for (i, point) in waypoints.iter().enumerate() {
        println!("waypoint {i:2}: {point}");
    }
    println!();

    let passages: Vec<Passage> = ensemble
        .iter()
        .map(|member| simulate(&waypoints, departure, member, &polar, &nav))
        .collect::<Result<_, _>>()
        .map_err(|e| e.to_string())?;

    for (i, passage) in passages.iter().enumerate() {
        let summary = summarize(passage.legs(), &nav).map_err(|e| e.to_string())?;
        let status = if passage.is_complete() {
            "complete"
        } else {
            "ran out of forecast"
        };
        println!(
            "member {i}: {:7} {:9}  wind [{:4.1} {:4.1} {:4.1}] kn  upwind {:3.0}%  ({status})",
            format!("{}", summary.hours),
            format!("{}", summary.distance),
            summary.wind_speed.min,
            summary.wind_speed.mean,
            summary.wind_speed.max,
            summary.upwind_fraction() * 100.0,
        );
    }

    // Tabulate the ensemble spread over the common prefix of the runs;
    // members that finish sooner cap how far the table can go.
    let shortest = passages.iter().map(|p| p.legs().len()).min().unwrap_or(0);
    let slices: Vec<&[Leg]> = passages.iter().map(|p| &p.legs()[..shortest]).collect();
    match summarize_ensemble(&slices) {
        Ok(rows) => {
            println!("\n{:^16} {:^18} {:^17} {:^17}", "time", "position", "wind kn", "step NM");
            for row in rows {
                print!(
                    "{} {:>18}  [{:4.1} {:4.1} {:4.1}]  [{:4.0} {:4.0} {:4.0}]",
                    row.time.format("%Y-%m-%d %H:%M"),
                    format!("{}", row.location),
                    row.wind_speed.min,
                    row.wind_speed.mean,
                    row.wind_speed.max,
                    row.step_distance.min,
                    row.step_distance.mean,
                    row.step_distance.max,
                );
                let mut aux: Vec<_> = row.aux.iter().collect();
                aux.sort_by_key(|(field, _)| field.name());
                for (field, stats) in aux {
                    print!("  {field}:[{:5.1} {:5.1} {:5.1}]", stats.min, stats.mean, stats.max);
                }
                println!();
            }
        }
        Err(e) => println!("\nno ensemble table: {e}"),
    }

    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    if let Err(message) = run(&args) {
        eprintln!("error: {message}");
        std::process::exit(1);
    }
}
