use clap::Parser;
use log::*;
use std::sync::Arc;

use bumpkin::{
    Args, Orchestrator, Result, RunConfig,
    ecosystem::{HelperEcosystem, Registry},
    forge::factory::ForgeFactory,
    merge::AutoMerger,
    pull_request::ForgePullRequestCreator,
};

fn initialize_logger(debug: bool) -> Result<()> {
    let filter = if debug {
        simplelog::LevelFilter::Debug
    } else {
        simplelog::LevelFilter::Info
    };

    let config = simplelog::ConfigBuilder::new()
        .add_filter_allow_str("bumpkin")
        .build();

    simplelog::TermLogger::init(
        filter,
        config,
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    Ok(())
}

async fn run(args: Args) -> Result<()> {
    let config = RunConfig::resolve(&args)?;

    let mut registry = Registry::builtin();

    if let Some(helper) = &args.ecosystem_helper {
        debug!(
            "registering ecosystem helper {} for {}",
            helper.display(),
            config.package_manager
        );
        registry = registry.register(
            config.package_manager,
            Arc::new(HelperEcosystem::new(helper.clone(), config.package_manager)),
        );
    }

    let ecosystem = registry.resolve(config.package_manager)?;

    let forge = ForgeFactory::create(
        &config.source,
        &config.credentials,
        config.dry_run,
    )
    .await?;

    let pr_creator = ForgePullRequestCreator::new(
        forge,
        config.source.clone(),
        config.package_manager,
    );

    let mut builder = Orchestrator::builder()
        .ecosystem(ecosystem)
        .pr_creator(Box::new(pr_creator));

    if let Some(auto_merge) = config.auto_merge {
        let client = ForgeFactory::create_merge_client(
            &config.source,
            &config.credentials,
        )
        .await?;
        builder = builder.auto_merger(AutoMerger::new(
            client,
            auto_merge.max_attempts,
            config.dry_run,
        ));
    }

    let summary = builder.config(config).build()?.run().await?;

    debug!("{summary:#?}");

    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();

    initialize_logger(args.debug)?;

    run(args).await?;

    Ok(())
}
