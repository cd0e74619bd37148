use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::*;
use std::path::{Path, PathBuf};
use tabled::{settings::Style, Table, Tabled};

use bwsim::config::{AppConfig, ScenarioFile};
use bwsim::export::{self, ExportFormat, ExportOptions, ExportRow};
use bwsim::logging::init_logging;
use bwsim::reference::{pal_from_activities, simple_pal, Activity, ActivityCategory, BmiCategory};
use bwsim::{
    Baseline, BaselineInputs, BwsError, ErrorSeverity, GoalPlan, GoalSearch, Intervention,
    Scenario, Sex, SimulationBands,
};

/// bwsim - Body Weight Simulator CLI
///
/// Projects body weight and composition day by day under a schedule of
/// changes to diet and activity, and solves for the daily intake that
/// reaches a goal weight.
#[derive(Parser)]
#[command(name = "bwsim")]
#[command(version)]
#[command(about = "Body Weight Simulator CLI", long_about = None)]
struct Cli {
    /// Sets a custom config file
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Increase verbosity of output
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the quantities derived from a profile
    Profile {
        #[command(flatten)]
        profile: ProfileArgs,
    },

    /// Simulate a schedule of diet and activity changes
    Simulate {
        #[command(flatten)]
        profile: ProfileArgs,

        #[command(flatten)]
        schedule: ScheduleArgs,

        /// Print every Nth day
        #[arg(short, long, default_value = "30")]
        every: usize,
    },

    /// Find the daily intake that reaches a goal weight
    Goal {
        #[command(flatten)]
        profile: ProfileArgs,

        #[command(flatten)]
        goal: GoalArgs,

        /// Also simulate the goal followed by maintenance
        #[arg(short, long)]
        simulate: bool,
    },

    /// Export simulated days to CSV or JSON
    Export {
        #[command(flatten)]
        profile: ProfileArgs,

        #[command(flatten)]
        schedule: ScheduleArgs,

        /// Export the goal scenario for this weight (kg) instead of a schedule
        #[arg(long)]
        goal_weight: Option<f64>,

        /// Goal horizon in days (defaults to the configured value)
        #[arg(long)]
        goal_days: Option<u32>,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// Export format (csv, json); guessed from the extension when omitted
        #[arg(short = 'f', long)]
        format: Option<String>,
    },

    /// Show or initialize the configuration file
    Config {
        /// Write a default configuration file
        #[arg(long)]
        init: bool,

        /// Overwrite an existing file with --init
        #[arg(long)]
        force: bool,
    },
}

/// Profile values overriding the configured profile
#[derive(Args, Debug)]
struct ProfileArgs {
    /// male or female
    #[arg(long)]
    sex: Option<Sex>,

    /// Age (years)
    #[arg(long)]
    age: Option<f64>,

    /// Height (cm)
    #[arg(long)]
    height: Option<f64>,

    /// Weight (kg)
    #[arg(long)]
    weight: Option<f64>,

    /// Body fat percentage; disables the estimate from age and BMI
    #[arg(long)]
    bfp: Option<f64>,

    /// Resting metabolic rate (kcal/day); disables the estimate
    #[arg(long)]
    rmr: Option<f64>,

    /// Physical activity level; overrides --leisure/--work and --exercise
    #[arg(long)]
    pal: Option<f64>,

    /// Leisure activity (very-light, light, moderate, active, very-active)
    #[arg(long, requires = "work")]
    leisure: Option<ActivityCategory>,

    /// Work activity (very-light, light, moderate, heavy)
    #[arg(long, requires = "leisure")]
    work: Option<ActivityCategory>,

    /// Recurring exercise as MET:MINUTES:TIMES[:DAYS], repeatable; estimates PAL
    #[arg(long = "exercise", value_name = "MET:MIN:TIMES[:DAYS]")]
    exercises: Vec<Activity>,
}

impl ProfileArgs {
    fn apply(&self, mut inputs: BaselineInputs) -> BaselineInputs {
        if self.sex.is_some() {
            inputs.sex = self.sex;
        }
        if self.age.is_some() {
            inputs.age = self.age;
        }
        if self.height.is_some() {
            inputs.height = self.height;
        }
        if self.weight.is_some() {
            inputs.weight = self.weight;
        }
        if self.bfp.is_some() {
            inputs.bfp = self.bfp;
            inputs.bfp_calc = Some(false);
        }
        if self.rmr.is_some() {
            inputs.rmr = self.rmr;
            inputs.rmr_calc = Some(false);
        }
        if let (Some(leisure), Some(work)) = (self.leisure, self.work) {
            inputs.pal = Some(simple_pal(leisure, work));
        }
        if !self.exercises.is_empty() {
            inputs.pal = Some(pal_from_activities(&self.exercises));
        }
        if self.pal.is_some() {
            inputs.pal = self.pal;
        }
        inputs
    }
}

/// Schedule from a scenario file or a single inline phase
#[derive(Args, Debug)]
struct ScheduleArgs {
    /// TOML scenario file with [[phases]]
    #[arg(long, value_name = "FILE", conflicts_with = "calories")]
    scenario: Option<PathBuf>,

    /// Start day of the inline phase
    #[arg(long, default_value = "0")]
    day: u32,

    /// Daily intake of the inline phase (kcal)
    #[arg(long)]
    calories: Option<f64>,

    /// Carbohydrate share of the inline phase (%)
    #[arg(long)]
    carbs: Option<f64>,

    /// Activity change of the inline phase (%)
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    activity: f64,

    /// Sodium of the inline phase (mg/day); proportional to intake when omitted
    #[arg(long)]
    sodium: Option<f64>,

    /// Ramp linearly into the inline phase
    #[arg(long)]
    ramp: bool,

    /// Days to simulate (defaults to the configured value)
    #[arg(short, long)]
    days: Option<usize>,

    /// Uncertainty band spread as % of maintenance (defaults to the configured value)
    #[arg(short, long)]
    uncertainty: Option<f64>,
}

impl ScheduleArgs {
    /// Phases and an optional profile override from the scenario file
    fn phases(&self, baseline: &Baseline) -> Result<(Vec<Intervention>, Option<BaselineInputs>)> {
        if let Some(path) = &self.scenario {
            let file = ScenarioFile::load_from_file(path)?;
            return Ok((file.phases, file.profile));
        }

        let Some(calories) = self.calories else {
            return Ok((Vec::new(), None));
        };
        let carbs = self.carbs.unwrap_or(baseline.carb_intake_pct());
        let phase = match self.sodium {
            Some(sodium) => Intervention::new(self.day, calories, carbs, self.activity, sodium),
            None => Intervention::with_proportional_sodium(
                self.day,
                calories,
                carbs,
                self.activity,
                baseline,
            ),
        }
        .with_ramp(self.ramp);

        Ok((vec![phase], None))
    }
}

#[derive(Args, Debug)]
struct GoalArgs {
    /// Goal weight (kg)
    #[arg(short = 'w', long = "goal-weight")]
    goal_weight: f64,

    /// Days to reach the goal (defaults to the configured value)
    #[arg(long = "goal-days")]
    goal_days: Option<u32>,

    /// Activity change while pursuing the goal (%)
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    activity: f64,

    /// Lowest intake to consider (kcal/day)
    #[arg(long)]
    min_calories: Option<f64>,
}

#[derive(Tabled)]
struct Quantity {
    #[tabled(rename = "Quantity")]
    name: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

fn quantity(name: &'static str, value: String) -> Quantity {
    Quantity { name, value }
}

#[derive(Tabled)]
struct DayRow {
    #[tabled(rename = "Day")]
    day: usize,
    #[tabled(rename = "Weight")]
    weight: String,
    #[tabled(rename = "Range")]
    range: String,
    #[tabled(rename = "Body Fat %")]
    bfp: String,
    #[tabled(rename = "BMI")]
    bmi: String,
    #[tabled(rename = "Intake")]
    intake: String,
    #[tabled(rename = "Expenditure")]
    expenditure: String,
}

impl From<&ExportRow> for DayRow {
    fn from(row: &ExportRow) -> Self {
        DayRow {
            day: row.day,
            weight: format!("{:.1}", row.weight),
            range: format!("{:.1} - {:.1}", row.lower_weight, row.upper_weight),
            bfp: format!("{:.1}", row.body_fat_percent),
            bmi: format!("{:.1}", row.bmi),
            intake: format!("{:.0}", row.intake),
            expenditure: format!("{:.0}", row.expenditure),
        }
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        match err.downcast_ref::<BwsError>() {
            Some(bws) => {
                match bws.severity() {
                    ErrorSeverity::Warning => tracing::warn!(error = %bws),
                    ErrorSeverity::Error => tracing::error!(error = %bws),
                }
                eprintln!("{} {}", "Error:".red().bold(), bws.user_message());
            }
            None => eprintln!("{} {:#}", "Error:".red().bold(), err),
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    if let Commands::Config { init: true, force } = cli.command {
        let path = cli
            .config
            .clone()
            .unwrap_or_else(AppConfig::default_config_path);
        return init_config(&path, force);
    }

    let config = AppConfig::load_or_default(cli.config.as_deref())?;

    let mut log_config = config.logging.clone();
    log_config.level = log_config.level.raised_by(cli.verbose);
    init_logging(&log_config)?;

    if cli.verbose > 0 {
        eprintln!("{}", format!("Log level: {:?}", log_config.level).dimmed());
    }

    match cli.command {
        Commands::Profile { profile } => {
            let baseline = Baseline::from_inputs(&profile.apply(config.profile.clone()));
            print_profile(&baseline);
        }

        Commands::Simulate {
            profile,
            schedule,
            every,
        } => {
            let (baseline, scenario) = schedule_scenario(&config, &profile, &schedule)?;
            let bands = run_bands(&config, &baseline, &scenario, &schedule);

            for warning in scenario.low_intake_warnings() {
                println!("{} {}", "Warning:".yellow().bold(), warning);
            }
            print_days(&config, &bands, every)?;
        }

        Commands::Goal {
            profile,
            goal,
            simulate,
        } => {
            let baseline = Baseline::from_inputs(&profile.apply(config.profile.clone()));
            let plan = solve_goal(&config, &baseline, &goal)?;
            print_plan(&config, &baseline, &plan);

            if simulate {
                let goal_days = plan_days(&config, goal.goal_days);
                let scenario = Scenario::from_goal_plan(&plan, &baseline, goal_days);
                let bands = SimulationBands::run(
                    &baseline,
                    &scenario,
                    config.simulation.sim_length.max(goal_days as usize),
                    config.simulation.uncertainty_percent,
                );
                print_days(&config, &bands, 30)?;
            }
        }

        Commands::Export {
            profile,
            schedule,
            goal_weight,
            goal_days,
            output,
            format,
        } => {
            let format = match format {
                Some(f) => f.parse::<ExportFormat>().map_err(BwsError::from)?,
                None => ExportFormat::from_path(&output).unwrap_or(ExportFormat::Csv),
            };

            let (baseline, scenario) = match goal_weight {
                Some(weight) => {
                    let baseline = Baseline::from_inputs(&profile.apply(config.profile.clone()));
                    let days = plan_days(&config, goal_days);
                    let request = config.goal.request(weight, Some(days));
                    let plan = GoalSearch::plan(&baseline, &request).map_err(BwsError::from)?;
                    let scenario = Scenario::from_goal_plan(&plan, &baseline, days);
                    (baseline, scenario)
                }
                None => schedule_scenario(&config, &profile, &schedule)?,
            };

            let bands = run_bands(&config, &baseline, &scenario, &schedule);
            let options = ExportOptions {
                format,
                units: config.display.units,
                energy_unit: config.display.energy_unit,
            };
            export::export_to_file(&bands, &options, &output)
                .map_err(BwsError::from)
                .with_context(|| format!("Failed to export to {}", output.display()))?;

            println!(
                "{} {} days to {}",
                "✓ Exported".green().bold(),
                bands.expected.len(),
                output.display()
            );
        }

        Commands::Config { .. } => {
            let path = cli
                .config
                .clone()
                .unwrap_or_else(AppConfig::default_config_path);
            println!("{} {}", "Configuration:".bold(), path.display());
            println!("{}", toml::to_string_pretty(&config)?);
        }
    }

    Ok(())
}

fn plan_days(config: &AppConfig, goal_days: Option<u32>) -> u32 {
    goal_days.unwrap_or(config.goal.goal_days)
}

fn schedule_scenario(
    config: &AppConfig,
    profile: &ProfileArgs,
    schedule: &ScheduleArgs,
) -> Result<(Baseline, Scenario)> {
    let configured = Baseline::from_inputs(&profile.apply(config.profile.clone()));
    let (phases, file_profile) = schedule.phases(&configured)?;

    let baseline = match file_profile {
        Some(inputs) => Baseline::from_inputs(&profile.apply(inputs)),
        None => configured,
    };

    Ok((baseline, Scenario::Schedule(phases)))
}

fn run_bands(
    config: &AppConfig,
    baseline: &Baseline,
    scenario: &Scenario,
    schedule: &ScheduleArgs,
) -> SimulationBands {
    SimulationBands::run(
        baseline,
        scenario,
        schedule.days.unwrap_or(config.simulation.sim_length),
        schedule
            .uncertainty
            .unwrap_or(config.simulation.uncertainty_percent),
    )
}

fn solve_goal(config: &AppConfig, baseline: &Baseline, goal: &GoalArgs) -> Result<GoalPlan> {
    let mut request = config
        .goal
        .request(goal.goal_weight, goal.goal_days)
        .with_activity_change(goal.activity);
    if let Some(min) = goal.min_calories {
        request = request.with_min_calories(min);
    }

    println!(
        "{}",
        format!(
            "Searching for the intake reaching {:.1} kg in {} days...",
            request.goal_weight, request.goal_days
        )
        .cyan()
        .bold()
    );

    Ok(GoalSearch::plan(baseline, &request).map_err(BwsError::from)?)
}

fn print_profile(baseline: &Baseline) {
    let range = baseline.healthy_weight_range();
    let composition = baseline.body_composition();
    let bmi = baseline.bmi();

    let rows = vec![
        quantity("Sex", baseline.sex().to_string()),
        quantity("Age", format!("{:.0} years", baseline.age())),
        quantity("Height", format!("{:.1} cm", baseline.height())),
        quantity("Weight", format!("{:.1} kg", baseline.weight())),
        quantity("BMI", format!("{:.1} ({})", bmi, BmiCategory::from_bmi(bmi))),
        quantity("Body fat", format!("{:.1} %", baseline.bfp())),
        quantity("Fat mass", format!("{:.1} kg", composition.fat)),
        quantity("Lean mass", format!("{:.1} kg", composition.lean)),
        quantity("RMR", format!("{:.0} kcal/day", baseline.rmr())),
        quantity("PAL", format!("{:.2}", baseline.pal())),
        quantity(
            "Maintenance",
            format!("{:.0} kcal/day", baseline.maintenance_calories()),
        ),
        quantity(
            "Activity expenditure",
            format!("{:.0} kcal/day", baseline.activity_expenditure()),
        ),
        quantity("Extracellular water", format!("{:.1} L", baseline.ecw())),
        quantity(
            "Healthy weight",
            format!("{:.0} - {:.0} kg", range.low, range.high),
        ),
    ];

    println!("{}", Table::new(rows).with(Style::rounded()));
}

fn print_plan(config: &AppConfig, baseline: &Baseline, plan: &GoalPlan) {
    let energy = config.display.energy_unit;
    let intake = energy.energy(plan.intervention.calories());
    let maintenance = energy.energy(plan.maintenance_calories);
    let current = energy.energy(baseline.maintenance_calories());

    let rows = vec![
        quantity("Goal intake", format!("{:.0} {}", intake, energy.label())),
        quantity("Current maintenance", format!("{:.0} {}", current, energy.label())),
        quantity(
            "Maintenance at goal",
            format!("{:.0} {}", maintenance, energy.label()),
        ),
        quantity("Weight on goal day", format!("{:.2} kg", plan.final_weight)),
        quantity(
            "Goal BMI",
            format!(
                "{:.1} ({})",
                plan.target_bmi,
                BmiCategory::from_bmi(plan.target_bmi)
            ),
        ),
    ];

    println!("{}", Table::new(rows).with(Style::rounded()));
    for warning in &plan.warnings {
        println!("{} {}", "Warning:".yellow().bold(), warning);
    }
}

fn print_days(config: &AppConfig, bands: &SimulationBands, every: usize) -> Result<()> {
    let options = ExportOptions {
        units: config.display.units,
        energy_unit: config.display.energy_unit,
        ..ExportOptions::default()
    };
    let rows = export::export_rows(bands, &options).map_err(BwsError::from)?;
    let step = every.max(1);
    let last = rows.len().saturating_sub(1);

    let shown: Vec<DayRow> = rows
        .iter()
        .filter(|r| r.day % step == 0 || r.day == last)
        .map(DayRow::from)
        .collect();

    println!(
        "{}",
        format!(
            "Weight in {}, energy in {}",
            options.units.mass_label(),
            options.energy_unit.label()
        )
        .dimmed()
    );
    println!("{}", Table::new(shown).with(Style::rounded()));
    Ok(())
}

fn init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        println!(
            "{} {} already exists (use --force to overwrite)",
            "Note:".yellow().bold(),
            path.display()
        );
        return Ok(());
    }

    let mut config = AppConfig::default();
    config.save_to_file(path)?;
    println!(
        "{} {}",
        "✓ Wrote default configuration to".green().bold(),
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile_inputs(args: &[&str]) -> BaselineInputs {
        let cli = Cli::try_parse_from(args.iter().copied()).unwrap();
        match cli.command {
            Commands::Profile { profile } => profile.apply(BaselineInputs::default()),
            _ => panic!("expected the profile command"),
        }
    }

    #[test]
    fn test_leisure_and_work_set_pal() {
        let inputs = profile_inputs(&["bwsim", "profile", "--leisure", "active", "--work", "heavy"]);
        assert_eq!(inputs.pal, Some(2.1));
    }

    #[test]
    fn test_exercise_list_sets_pal() {
        let inputs = profile_inputs(&["bwsim", "profile", "--exercise", "8:60:7", "--exercise", "3:30:2"]);
        let expected = pal_from_activities(&[
            "8:60:7".parse().unwrap(),
            "3:30:2".parse().unwrap(),
        ]);
        assert_eq!(inputs.pal, Some(expected));
        assert!(expected > 1.29);
    }

    #[test]
    fn test_explicit_pal_wins() {
        let inputs = profile_inputs(&[
            "bwsim", "profile", "--leisure", "light", "--work", "light", "--pal", "1.9",
        ]);
        assert_eq!(inputs.pal, Some(1.9));
    }

    #[test]
    fn test_leisure_requires_work() {
        assert!(Cli::try_parse_from(["bwsim", "profile", "--leisure", "light"]).is_err());
        assert!(Cli::try_parse_from(["bwsim", "profile", "--exercise", "8:60"]).is_err());
    }
}
