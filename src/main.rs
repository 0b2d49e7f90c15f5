use fsort::cli::{AppConfig, Args};
use fsort::config::UserConfig;
use fsort::engine::{Organizer, ProgressEvent};
use fsort::logging::init_logging;
use fsort::taxonomy::{group_categories, GROUPS};
use std::io::{self, Write};
use std::process::ExitCode;

fn main() -> ExitCode {
    // Parse command line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    init_logging(args.verbose);

    // Load user configuration
    let user_config = UserConfig::load().unwrap_or_else(|e| {
        eprintln!("Warning: Failed to load user config: {}", e);
        UserConfig::default()
    });

    let config = AppConfig::from_args(args, &user_config);

    match run(&config, &user_config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(config: &AppConfig, user_config: &UserConfig) -> fsort::Result<()> {
    if config.list {
        print_taxonomy();
        return Ok(());
    }

    if config.save_defaults {
        let path = config.to_user_config(user_config).save()?;
        println!("Saved defaults to {}", path.display());
    }

    if config.sources.is_empty() {
        println!("No source folders found. Pass one or more folders to organize.");
        return Ok(());
    }

    if config.categories.is_empty() {
        println!("No categories selected (use --category, --group or --all)");
        return Ok(());
    }

    let organizer = Organizer::new(config.sources.clone(), config.run_config())
        .with_workers(config.workers);

    if config.dry_run {
        return print_plan(&organizer);
    }

    let mut stdout = io::stdout();
    let mut progress = |event: &ProgressEvent| {
        let percent = (event.fraction() * 100.0) as u32;
        let _ = writeln!(stdout, "{:>3}% {}", percent, event.message);
    };

    let result = organizer.run(&mut progress)?;

    println!();
    println!("Organized {} files", result.moved_count);
    println!("   Destination: {}", config.destination_root().display());
    println!("   Log: {}", result.log_file.display());

    let problems: Vec<&str> = result.problems().collect();
    if !problems.is_empty() {
        println!();
        println!("{} entries were not organized:", problems.len());
        for line in problems {
            println!("   {}", line);
        }
    }

    Ok(())
}

fn print_plan(organizer: &Organizer) -> fsort::Result<()> {
    let plan = organizer.plan()?;

    println!("[DRY RUN] No files will be moved");
    for warning in &plan.warnings {
        println!("   {}", warning);
    }
    for item in &plan.items {
        println!(
            "   {} -> {}",
            item.source.display(),
            item.destination.join(item.file_name()).display()
        );
    }
    println!("   {} files would be organized", plan.total());
    Ok(())
}

fn print_taxonomy() {
    for group in GROUPS {
        println!("{}", group);
        for category in group_categories(group) {
            println!("   {:<16} {}", category.name, category.extensions.join(" "));
        }
    }
}
