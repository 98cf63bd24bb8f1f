//! CLI smoke entry point.
//!
//! # Responsibility
//! - Wire a default host and a mod manager end to end.
//! - Print the resulting registry state deterministically.

use modweave_core::{
    init_logging, CodeUnitManifest, DefaultHost, IntegrationKind, ModBootstrap, ModDescriptor,
    ModManager, ModResult, RuntimeConfig, System, TypeDescriptor,
};
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Default)]
struct GreetingBootstrap {
    owner: Option<Arc<ModDescriptor>>,
}

impl ModBootstrap for GreetingBootstrap {
    fn attach_mod(&mut self, descriptor: Arc<ModDescriptor>) {
        self.owner = Some(descriptor);
    }

    fn register(&mut self) {
        if let Some(owner) = &self.owner {
            println!("bootstrap mod={owner}");
        }
    }
}

#[derive(Default)]
struct FrameCounter {
    frames: u64,
}

impl System for FrameCounter {
    fn update(&mut self) {
        self.frames += 1;
    }
}

#[derive(Default)]
struct ModBanner {
    owners: Vec<String>,
}

impl System for ModBanner {
    fn receive_mod_identity(&mut self, descriptor: &Arc<ModDescriptor>) {
        self.owners.push(descriptor.name_id.clone());
    }
}

fn run(config: &RuntimeConfig) -> ModResult<()> {
    let mut host = DefaultHost::new();
    let mut manager = ModManager::with_config(config);
    manager.events_mut().on_new_mod.subscribe(|descriptor| {
        println!("mod_ready index={} name_id={}", descriptor.index, descriptor.name_id);
    });

    let core = CodeUnitManifest::new("core")
        .declare(TypeDescriptor::bootstrap::<GreetingBootstrap>())
        .declare(TypeDescriptor::global_system::<FrameCounter>())
        .declare(TypeDescriptor::global_system::<ModBanner>());
    let extras = CodeUnitManifest::new("extras")
        .declare(TypeDescriptor::mod_system::<FrameCounter>())
        .declare(TypeDescriptor::global_system::<ModBanner>())
        .declare_broken("LegacyWidget", "unresolved base type");

    {
        let mut session = manager.begin_internal_registration()?;
        session.add_internal_mod(&mut host, "Core", "core", &[&core])?;
        session.end();
    }
    manager.register_package(
        &mut host,
        &[&extras],
        "Extras",
        "extras",
        IntegrationKind::External,
    )?;
    manager.notify_all_mods_loaded();
    host.tick();

    for descriptor in manager.loaded_mods() {
        println!(
            "mod index={} name_id={} systems={:?}",
            descriptor.index,
            descriptor.name_id,
            manager.mod_world(&descriptor).system_names()
        );
    }
    println!("shared systems={:?}", host.shared_world().system_names());
    if let Some(banner) = host.shared_world().system::<ModBanner>() {
        println!("banner owners={:?}", banner.owners);
    }
    println!("diagnostics={}", manager.diagnostics().len());
    println!("pending_external={}", manager.pending_external_loads().len());
    Ok(())
}

fn main() -> ExitCode {
    println!("modweave_core version={}", modweave_core::core_version());

    let config = match RuntimeConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("config error: {err}");
            return ExitCode::FAILURE;
        }
    };
    if let Err(err) = init_logging(&config.log) {
        eprintln!("logging disabled: {err}");
    }

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("event=cli_run module=cli status=error error={err}");
            eprintln!("registration failed: {err}");
            ExitCode::FAILURE
        }
    }
}
