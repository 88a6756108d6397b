use academy_auth::{AccessOperation, AccessService, ANY_ENTITY};
use academy_models::{object_id, EntityKind};
use anyhow::anyhow;
use clap::{Args, Subcommand};
use diesel::{Connection, PgConnection};

mod make_api_key;

#[derive(Debug, Args)]
pub struct AdminArgs {
    #[clap(subcommand)]
    commands: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create an object ID
    ///
    /// This is useful for generating a package of initial data or for other testing.
    MakeId(MakeId),
    /// Create an API key for a role
    MakeApiKey(make_api_key::MakeApiKeyArgs),
    /// Give a role permission to perform an operation
    Grant(GrantArgs),
    /// Apply pending database migrations
    Migrate(MigrateArgs),
}

#[derive(Debug, Args)]
pub struct MakeId {
    #[clap(subcommand)]
    command: IdType,
}

#[derive(Debug, Subcommand)]
enum IdType {
    Academy,
    Team,
    Coach,
    Player,
    TrainingPlan,
    Exercise,
    PlayerTrainingPlan,
    PlayerPerformance,
}

#[derive(Debug, Args)]
pub struct GrantArgs {
    /// The role receiving the permission
    role: String,
    /// The service, `project` or `platform`
    service: AccessService,
    /// An entity name such as `team`, or `*` for every entity
    entity: String,
    /// One of `create`, `read`, `update`, or `delete`
    operation: AccessOperation,
    #[clap(short, long, help = "Database connection string", env = "DATABASE_URL")]
    database: String,
}

#[derive(Debug, Args)]
pub struct MigrateArgs {
    #[clap(short, long, help = "Database connection string", env = "DATABASE_URL")]
    database: String,
}

pub fn admin_commands(cmd: AdminArgs) -> Result<(), anyhow::Error> {
    match cmd.commands {
        Commands::MakeId(MakeId { command }) => make_id(command),
        Commands::MakeApiKey(args) => make_api_key::main(args)?,
        Commands::Grant(args) => grant(args)?,
        Commands::Migrate(args) => migrate(args)?,
    }

    Ok(())
}

fn make_id(id: IdType) {
    let id = match id {
        IdType::Academy => object_id::AcademyId::new().to_string(),
        IdType::Team => object_id::TeamId::new().to_string(),
        IdType::Coach => object_id::CoachId::new().to_string(),
        IdType::Player => object_id::PlayerId::new().to_string(),
        IdType::TrainingPlan => object_id::TrainingPlanId::new().to_string(),
        IdType::Exercise => object_id::ExerciseId::new().to_string(),
        IdType::PlayerTrainingPlan => object_id::PlayerTrainingPlanId::new().to_string(),
        IdType::PlayerPerformance => object_id::PlayerPerformanceId::new().to_string(),
    };

    println!("{id}");
}

fn grant(args: GrantArgs) -> Result<(), anyhow::Error> {
    if args.entity != ANY_ENTITY && EntityKind::from_name(&args.entity).is_none() {
        return Err(anyhow!("Unknown entity {}", args.entity));
    }

    let mut conn = PgConnection::establish(args.database.as_str())?;
    let permission = academy_db::role_permissions::RolePermission {
        role: args.role,
        service: args.service.to_string(),
        entity: args.entity,
        operation: args.operation.to_string(),
    };
    academy_db::role_permissions::grant(&mut conn, &permission)?;

    println!(
        "Granted {}:{}:{} to {}",
        permission.service, permission.entity, permission.operation, permission.role
    );
    Ok(())
}

fn migrate(args: MigrateArgs) -> Result<(), anyhow::Error> {
    let mut conn = PgConnection::establish(args.database.as_str())?;
    let applied = academy_db::run_migrations(&mut conn).map_err(|e| anyhow!(e))?;
    if applied.is_empty() {
        println!("Database is up to date");
    }
    for version in applied {
        println!("Applied {version}");
    }
    Ok(())
}
