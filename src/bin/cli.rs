use clap::{Args, Parser, Subcommand};
use profile_service::{
    cli::{
        db::{db_generate, db_list, db_migrate, db_revert},
        uploads::{prune_orphans, PRUNE_GRACE_PERIOD},
        user,
    },
    core::{
        db::{close_pool, init_pool},
        file_store::FileStore,
    },
    model::user::UserFields,
    settings::get_config,
};

#[derive(Parser)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Database related command
    Db(DbArgs),
    /// User profile related command
    User(UserArgs),
    /// Uploaded file related command
    Uploads(UploadsArgs),
}

#[derive(Debug, Args)]
struct UserArgs {
    #[command(subcommand)]
    command: UserCommands,
}

#[derive(Debug, Subcommand)]
enum UserCommands {
    /// Create new user profile
    Create {
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        first_name: String,
        #[arg(short, long)]
        last_name: String,
        #[arg(long)]
        country: Option<String>,
        #[arg(long)]
        city: Option<String>,
        #[arg(long)]
        phone_number: Option<String>,
    },
}

#[derive(Debug, Args)]
struct UploadsArgs {
    #[command(subcommand)]
    command: UploadsCommands,
}

#[derive(Debug, Subcommand)]
enum UploadsCommands {
    /// Delete uploaded files no user references
    Prune,
}

#[derive(Debug, Args)]
struct DbArgs {
    #[command(subcommand)]
    command: DbCommands,
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    /// Generate new migration file
    Generate { migration_name: String },
    /// List all migration
    List,
    /// Run all pending migration
    Migrate,
    /// Revert latest migration
    Revert,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Db(db_args) => match db_args.command {
            DbCommands::Generate { migration_name } => {
                println!("generate migration: {migration_name:?}");
                db_generate(&migration_name).await?;
            }
            DbCommands::List => {
                println!("list migration");
                let config = get_config()?;
                db_list(&config).await?;
            }
            DbCommands::Migrate => {
                println!("run all pending migration");
                let config = get_config()?;
                println!("run migration on {}", config.database_url);
                let pool = init_pool(&config).await?;
                db_migrate(&pool).await?;
                close_pool(&pool).await;
            }
            DbCommands::Revert => {
                println!("revert latest migration");
                let config = get_config()?;
                println!("{}", config.database_url);
                db_revert(&config).await?;
            }
        },
        Commands::User(user_args) => match user_args.command {
            UserCommands::Create {
                email,
                first_name,
                last_name,
                country,
                city,
                phone_number,
            } => {
                println!("create user: {email:?}");
                let config = get_config()?;
                let pool = init_pool(&config).await?;
                let fields = UserFields {
                    email,
                    first_name,
                    last_name,
                    country,
                    city,
                    phone_number,
                    profile_picture: None,
                };
                let created = user::create_user(&pool, fields).await;
                close_pool(&pool).await;
                println!("created user with id {}", created?.id);
            }
        },
        Commands::Uploads(uploads_args) => match uploads_args.command {
            UploadsCommands::Prune => {
                let config = get_config()?;
                let pool = init_pool(&config).await?;
                let file_store = FileStore::new(&config.upload_dir);
                let removed = prune_orphans(&pool, &file_store, PRUNE_GRACE_PERIOD).await;
                close_pool(&pool).await;
                println!("removed {} orphaned upload(s)", removed?);
            }
        },
    }
    Ok(())
}
