use tabled::Table;

use crate::{
    config::Settings,
    error, info,
    management::{RoutineStore, UserRegistry},
    programs::Program,
    success,
    types::RoutineTableRow,
    warning,
};

use super::programs::execute;

pub async fn list_routines(settings: &Settings) {
    let store = RoutineStore::new(settings);
    let routines = match store.get_routines().await {
        Ok(routines) => routines,
        Err(e) => error!("Cannot load routines. Err: {}", e),
    };

    if routines.is_empty() {
        warning!("No routines saved yet, use --save on any program");
        return;
    }

    let rows: Vec<RoutineTableRow> = routines
        .into_iter()
        .map(|(name, routine)| RoutineTableRow {
            name,
            program: routine.prog.to_string(),
            description: routine.desc,
        })
        .collect();
    println!("{}", Table::new(rows));
}

pub async fn remove_routine(settings: &Settings, name: &str) {
    let store = RoutineStore::new(settings);
    match store.remove(name).await {
        Ok(routine) => success!("Routine {} ({}) removed", name, routine.prog),
        Err(e) => error!("Cannot remove routine {}. Err: {}", name, e),
    }
}

/// Runs a saved routine. The target emptiness guard was applied when the
/// routine was saved.
pub async fn run_routine(settings: &Settings, name: &str) {
    let store = RoutineStore::new(settings);
    let routine = match store.get(name).await {
        Ok(routine) => routine,
        Err(e) => error!("{}", e),
    };
    let program = match Program::from_routine(&routine) {
        Ok(program) => program,
        Err(e) => error!("Routine {} is broken. Err: {}", name, e),
    };

    info!("Running routine {}: {}", name, routine.desc);
    execute(settings, &UserRegistry::new(settings), &program).await;
}
