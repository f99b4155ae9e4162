use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use expense_ledger::cli::{
    handle_account_command, handle_category_command, handle_dashboard_command,
    handle_history_command, handle_settings_command, handle_summary_command,
    handle_transaction_command, HistoryArgs, SummaryArgs,
};
use expense_ledger::config::{paths::LedgerPaths, settings::Settings};
use expense_ledger::storage::{init::initialize_storage, Storage};

#[derive(Parser)]
#[command(
    name = "expense",
    version,
    about = "Terminal expense tracker",
    long_about = "Track income, expenses and transfers across accounts, then \
                  summarize them by category and account for today, this week, \
                  this month, this year or any custom date range."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the ledger with default categories and a Cash account
    Init,

    /// Show current configuration and paths
    Config,

    /// Account management commands
    #[command(subcommand)]
    Account(expense_ledger::cli::AccountCommands),

    /// Category management commands
    #[command(subcommand)]
    Category(expense_ledger::cli::CategoryCommands),

    /// Transaction management commands
    #[command(subcommand, alias = "txn")]
    Transaction(expense_ledger::cli::TransactionCommands),

    /// Income, expense and net totals for a date range
    Summary(SummaryArgs),

    /// Balances and the default summary at a glance
    Dashboard,

    /// View or change settings
    #[command(subcommand)]
    Settings(expense_ledger::cli::SettingsCommands),

    /// Show recent changes from the audit log
    History(HistoryArgs),
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = LedgerPaths::new()?;
    let mut settings = Settings::load_or_create(&paths)?;

    // Initialize storage
    let storage = Storage::new(paths.clone())?;
    storage.load_all()?;

    match cli.command {
        Some(Commands::Init) => {
            println!("Initializing expense ledger at: {}", paths.base_dir().display());
            initialize_storage(&paths)?;
            settings.onboarding_completed = true;
            settings.save(&paths)?;
            storage.load_all()?;
            println!("Initialization complete!");
            println!();
            println!("Default categories have been created:");
            println!("  - Income:  Business, Gifts, Salary");
            println!("  - Expense: Bills, Entertainment, Food, Health, Shopping, Transport");
            println!("and a \"Cash\" account.");
            println!();
            println!("Run 'expense category list' to see all categories.");
        }
        Some(Commands::Config) => {
            println!("Expense Ledger Configuration");
            println!("============================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Data directory:   {}", paths.data_dir().display());
            println!("Settings file:    {}", paths.settings_file().display());
            println!("Audit log:        {}", paths.audit_log().display());
            println!("Initialized:      {}", storage.is_initialized());
            println!();
            println!("Settings:");
            println!("  Currency:     {}", settings.currency);
            println!("  Date range:   {}", settings.date_range);
            println!("  Week starts:  {}", settings.week_start());
            println!("  Date format:  {}", settings.date_format);
        }
        Some(Commands::Account(cmd)) => {
            handle_account_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Category(cmd)) => {
            handle_category_command(&storage, cmd)?;
        }
        Some(Commands::Transaction(cmd)) => {
            handle_transaction_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Summary(args)) => {
            handle_summary_command(&storage, &settings, args)?;
        }
        Some(Commands::Dashboard) => {
            handle_dashboard_command(&storage, &settings)?;
        }
        Some(Commands::Settings(cmd)) => {
            handle_settings_command(&storage, &mut settings, cmd)?;
        }
        Some(Commands::History(args)) => {
            handle_history_command(&storage, args)?;
        }
        None => {
            println!("Expense Ledger - terminal expense tracking");
            println!();
            println!("Run 'expense --help' for usage information.");
            println!("Run 'expense init' to set up a new ledger.");
        }
    }

    Ok(())
}
