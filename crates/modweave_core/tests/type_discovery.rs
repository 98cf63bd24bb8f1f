use modweave_core::{
    discover_types, CodeUnit, CodeUnitManifest, DefaultHost, IntegrationKind, ModBootstrap,
    ModManager, System, TypeDescriptor, TypeFilter, TypeLineage,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Default)]
struct Pathfinding;

impl System for Pathfinding {}

#[derive(Default)]
struct Lighting;

impl System for Lighting {}

#[derive(Default)]
struct Seeder;

impl ModBootstrap for Seeder {
    fn register(&mut self) {}
}

fn partially_broken_unit() -> CodeUnitManifest {
    CodeUnitManifest::new("broken")
        .declare(TypeDescriptor::mod_system::<Pathfinding>())
        .declare_broken("Navmesh", "could not resolve base type NavBase")
        .declare(TypeDescriptor::global_system::<Lighting>())
        .declare_broken("Shader", "missing native dependency")
        .declare(TypeDescriptor::plain("Config"))
}

#[test]
fn partial_failure_yields_resolved_types_and_one_diagnostic_per_failure() {
    let unit = partially_broken_unit();
    let mut diagnostics = Vec::new();

    let types = discover_types(&unit, &mut diagnostics);

    assert_eq!(types.len(), 3);
    assert_eq!(diagnostics.len(), 2);
    let failed: Vec<&str> = diagnostics
        .iter()
        .map(|diagnostic| diagnostic.type_name.as_str())
        .collect();
    assert_eq!(failed, vec!["Navmesh", "Shader"]);
    assert!(diagnostics.iter().all(|diagnostic| diagnostic.unit_id == unit.id()));
    assert!(diagnostics[0].to_string().contains("NavBase"));
}

#[test]
fn discovery_is_restartable() {
    let unit = partially_broken_unit();
    let mut diagnostics = Vec::new();

    let first: Vec<String> = discover_types(&unit, &mut diagnostics)
        .iter()
        .map(|entry| entry.name().to_string())
        .collect();
    let second: Vec<String> = discover_types(&unit, &mut diagnostics)
        .iter()
        .map(|entry| entry.name().to_string())
        .collect();

    assert_eq!(first, second);
    assert_eq!(diagnostics.len(), 4);
}

#[test]
fn registration_survives_broken_types_and_records_diagnostics() {
    let unit = partially_broken_unit();
    let mut manager = ModManager::new();
    let mut host = DefaultHost::new();

    let descriptor = manager
        .register_package(&mut host, &[&unit], "Broken", "broken", IntegrationKind::Integrated)
        .expect("registration should tolerate broken types");

    assert!(manager.mod_world(&descriptor).contains::<Pathfinding>());
    assert!(host.shared_world().contains::<Lighting>());
    assert_eq!(manager.diagnostics().len(), 2);
}

#[test]
fn filters_exclude_opted_out_generic_and_abstract_types() {
    let constructions = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&constructions);
    let unit = CodeUnitManifest::new("filtered")
        .declare(
            TypeDescriptor::global_system_with(move || {
                counter.fetch_add(1, Ordering::SeqCst);
                Lighting
            })
            .disable_auto_creation(),
        )
        .declare(TypeDescriptor::mod_system::<Pathfinding>().generic())
        .declare(TypeDescriptor::abstract_type("BaseSystem", TypeLineage::GlobalSystem))
        .declare(TypeDescriptor::bootstrap::<Seeder>());
    let mut manager = ModManager::new();
    let mut host = DefaultHost::new();

    let descriptor = manager
        .register_package(&mut host, &[&unit], "Filtered", "filtered", IntegrationKind::Integrated)
        .expect("registration");

    assert_eq!(constructions.load(Ordering::SeqCst), 0);
    assert!(host.shared_world().is_empty());
    assert!(manager.mod_world(&descriptor).is_empty());
    assert!(manager.diagnostics().is_empty());

    let mut diagnostics = Vec::new();
    let systems = discover_types(&unit, &mut diagnostics).filter(&TypeFilter::systems());
    assert!(systems.is_empty());
    let bootstraps = discover_types(&unit, &mut diagnostics).filter(&TypeFilter::bootstraps());
    assert_eq!(bootstraps.len(), 1);
}
