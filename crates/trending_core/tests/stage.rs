use trending_core::{PageRun, Stage};

#[test]
fn success_path_visits_every_stage_in_order() {
    let mut run = PageRun::new("fid_drift_mon3");
    let mut seen = vec![run.stage()];
    while !run.stage().is_terminal() {
        seen.push(run.advance());
    }
    assert_eq!(
        seen,
        vec![
            Stage::Pending,
            Stage::Resolving,
            Stage::Fetching,
            Stage::Extracting,
            Stage::Selecting,
            Stage::Succeeded,
        ]
    );
    assert_eq!(run.failed_at(), None);
}

#[test]
fn failure_remembers_the_active_stage() {
    let mut run = PageRun::new("celmon");
    run.advance();
    run.advance();
    assert_eq!(run.fail(), Stage::Fetching);
    assert_eq!(run.stage(), Stage::Failed);
    assert_eq!(run.failed_at(), Some(Stage::Fetching));
}

#[test]
fn terminal_stages_do_not_move() {
    assert_eq!(Stage::Succeeded.advance(), Stage::Succeeded);
    assert_eq!(Stage::Succeeded.fail(), Stage::Succeeded);
    assert_eq!(Stage::Failed.advance(), Stage::Failed);

    let mut run = PageRun::new("vv_rms");
    run.advance();
    run.fail();
    run.advance();
    assert_eq!(run.stage(), Stage::Failed);
    assert_eq!(run.fail(), Stage::Resolving);
}
