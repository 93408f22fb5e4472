use internship_pipeline::config::PipelineConfig;
use internship_pipeline::workflows::internship::{
    CandidateLifecycleService, InMemoryCandidateRepository, InMemoryStaffRepository,
    StaffDirectory,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) type MemoryLifecycleService =
    CandidateLifecycleService<InMemoryCandidateRepository, InMemoryStaffRepository>;

/// Services sharing one pair of in-memory stores.
pub(crate) struct Pipeline {
    pub(crate) candidates: Arc<MemoryLifecycleService>,
    pub(crate) staff: Arc<StaffDirectory<InMemoryStaffRepository>>,
}

pub(crate) fn in_memory_pipeline(config: &PipelineConfig) -> Pipeline {
    let candidate_store = Arc::new(InMemoryCandidateRepository::default());
    let staff_store = Arc::new(InMemoryStaffRepository::default());

    let candidates = Arc::new(CandidateLifecycleService::with_options(
        candidate_store,
        staff_store.clone(),
        config.assignment_strategy,
        config.write_concurrency,
    ));
    let staff = Arc::new(StaffDirectory::new(staff_store));

    Pipeline { candidates, staff }
}
