use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use kindergrove_ops::commands::{admin, db, menus, patch, rbac};
use kindergrove_ops::seeder::{self, assessments, parents, todos};
use kindergrove_ops::logging;

#[derive(Parser)]
#[command(name = "kindergrove-ops")]
#[command(about = "Maintenance, seeding, and diagnostic tools for the Kindergrove database", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Menu-permission catalog: sync, check, show
    Menus {
        #[command(subcommand)]
        command: MenusCommand,
    },
    /// Role/permission maintenance and diagnostics
    Rbac {
        #[command(subcommand)]
        command: RbacCommand,
    },
    /// One-time data patches with a consistent ledger
    Patch {
        #[command(subcommand)]
        command: PatchCommand,
    },
    /// Seed demo and assessment data
    Seed {
        #[command(subcommand)]
        command: SeedCommand,
    },
    /// Clear seeded demo data (never operator accounts)
    Clear {
        #[command(subcommand)]
        command: ClearCommand,
    },
    /// Create an admin account
    CreateAdmin {
        /// First name of the admin
        #[arg(short = 'f', long)]
        first_name: Option<String>,

        /// Last name of the admin
        #[arg(short = 'l', long)]
        last_name: Option<String>,

        /// Email address
        #[arg(short = 'e', long)]
        email: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Apply schema migrations
    Migrate,
}

#[derive(Subcommand)]
enum MenusCommand {
    /// Upsert the catalog into the permissions table
    Sync {
        /// Delete permission rows whose code left the catalog
        #[arg(long)]
        prune: bool,

        /// Print the plan without writing
        #[arg(long)]
        dry_run: bool,
    },
    /// Validate the catalog and report database drift
    Check,
    /// Print the catalog tree, optionally as one role would see it
    Show {
        /// Role slug to preview (rule only, ignores grants)
        #[arg(long)]
        role: Option<String>,
    },
}

#[derive(Subcommand)]
enum RbacCommand {
    /// List a role's granted permissions grouped by family
    Show {
        /// Role slug
        #[arg(long)]
        role: String,
    },
    /// Grant catalog permissions to a role
    Grant {
        /// Role slug
        #[arg(long)]
        role: String,

        /// Grant every catalog code starting with this prefix (repeatable)
        #[arg(long)]
        prefix: Vec<String>,

        /// Grant this exact catalog code (repeatable)
        #[arg(long)]
        code: Vec<String>,

        /// Print the plan without writing
        #[arg(long)]
        dry_run: bool,
    },
    /// Revoke catalog permissions from a role
    Revoke {
        /// Role slug
        #[arg(long)]
        role: String,

        /// Revoke every catalog code starting with this prefix (repeatable)
        #[arg(long)]
        prefix: Vec<String>,

        /// Revoke this exact catalog code (repeatable)
        #[arg(long)]
        code: Vec<String>,

        /// Print the plan without writing
        #[arg(long)]
        dry_run: bool,
    },
    /// Resolve the menu tree a role sees with its live grants
    Visibility {
        /// Role slug
        #[arg(long)]
        role: String,

        /// Emit the tree as JSON
        #[arg(long)]
        json: bool,
    },
    /// Whole-database RBAC diagnostic report
    Audit,
}

#[derive(Subcommand)]
enum PatchCommand {
    /// List registered patches and their ledger status
    List,
    /// Run one patch and record it
    Run {
        /// Patch name
        name: String,

        /// Re-run even if the ledger already records it
        #[arg(long)]
        force: bool,
    },
    /// Run every patch the ledger has not seen
    RunPending,
    /// Record a patch as applied without running it
    Mark {
        /// Patch name
        name: String,
    },
}

#[derive(Subcommand)]
enum SeedCommand {
    /// Seed the assessment question bank
    Assessments {
        /// Drop and rebuild an existing bank
        #[arg(long)]
        replace: bool,
    },
    /// Seed demo parent accounts
    Parents {
        /// Number of parents to create
        #[arg(short = 'c', long, default_value = "20")]
        count: usize,

        /// Password for the seeded accounts
        #[arg(long, default_value = seeder::DEFAULT_SEED_PASSWORD)]
        password: String,
    },
    /// Seed todos for the seeded demo users
    Todos {
        /// Todos per user
        #[arg(long, default_value = "5")]
        per_user: usize,
    },
}

#[derive(Subcommand)]
enum ClearCommand {
    /// Delete all seeded demo data (parents and their todos)
    SeedData,
    /// Delete todos belonging to seeded users
    Todos,
    /// Delete seeded parent accounts
    Parents,
}

#[tokio::main]
async fn main() {
    dotenv().ok();
    logging::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("\n❌ {e:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let pool = kindergrove_db::init_db_pool().await?;

    match cli.command {
        Commands::Menus { command } => match command {
            MenusCommand::Sync { prune, dry_run } => menus::sync(&pool, prune, dry_run).await,
            MenusCommand::Check => menus::check(&pool).await,
            MenusCommand::Show { role } => menus::show(role.as_deref()),
        },
        Commands::Rbac { command } => match command {
            RbacCommand::Show { role } => rbac::show(&pool, &role).await,
            RbacCommand::Grant {
                role,
                prefix,
                code,
                dry_run,
            } => {
                let selectors = rbac::Selectors {
                    prefixes: prefix,
                    codes: code,
                };
                rbac::grant(&pool, &role, &selectors, dry_run).await
            }
            RbacCommand::Revoke {
                role,
                prefix,
                code,
                dry_run,
            } => {
                let selectors = rbac::Selectors {
                    prefixes: prefix,
                    codes: code,
                };
                rbac::revoke(&pool, &role, &selectors, dry_run).await
            }
            RbacCommand::Visibility { role, json } => {
                rbac::visibility_report(&pool, &role, json).await
            }
            RbacCommand::Audit => rbac::audit(&pool).await,
        },
        Commands::Patch { command } => match command {
            PatchCommand::List => patch::list(&pool).await,
            PatchCommand::Run { name, force } => patch::run(&pool, &name, force).await,
            PatchCommand::RunPending => patch::run_pending(&pool).await,
            PatchCommand::Mark { name } => patch::mark(&pool, &name).await,
        },
        Commands::Seed { command } => match command {
            SeedCommand::Assessments { replace } => {
                assessments::seed_assessments(&pool, replace).await
            }
            SeedCommand::Parents { count, password } => {
                parents::seed_parents(&pool, count, &password).await
            }
            SeedCommand::Todos { per_user } => todos::seed_todos(&pool, per_user).await,
        },
        Commands::Clear { command } => match command {
            ClearCommand::SeedData => {
                todos::clear_todos(&pool).await?;
                parents::clear_parents(&pool).await?;
                Ok(())
            }
            ClearCommand::Todos => todos::clear_todos(&pool).await.map(|_| ()),
            ClearCommand::Parents => parents::clear_parents(&pool).await.map(|_| ()),
        },
        Commands::CreateAdmin {
            first_name,
            last_name,
            email,
            password,
        } => admin::create_admin(&pool, first_name, last_name, email, password).await,
        Commands::Migrate => db::migrate(&pool).await,
    }
}
