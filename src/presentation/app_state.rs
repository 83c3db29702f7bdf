// Application state for HTTP handlers
use crate::application::alerts_service::AlertFeed;
use crate::application::chart_builder::ChartProfile;
use crate::application::history_service::HistoryView;
use crate::application::lifecycle_service::RecordLifecycleController;
use crate::application::live_service::LivePage;
use crate::application::maintenance_service::MaintenanceCounter;
use crate::application::nominal_service::NominalSessionConfig;
use crate::application::spray_line_repository::SprayLineRepository;
use crate::domain::lifecycle::RecordKind;
use crate::infrastructure::config::PagesConfig;
use std::collections::HashMap;
use std::sync::Arc;

pub struct AppState {
    pub live_pages: HashMap<String, LivePage>,
    pub history: HistoryView,
    pub sessions: RecordLifecycleController,
    pub products: RecordLifecycleController,
    pub maintenance: Arc<MaintenanceCounter>,
    pub alerts: AlertFeed,
    pub nominal: NominalSessionConfig,
}

impl AppState {
    pub fn new(repository: Arc<dyn SprayLineRepository>, pages: &PagesConfig) -> Self {
        let live_pages = pages
            .pages
            .iter()
            .map(|(name, page)| (name.clone(), LivePage::new(page.to_spec(name), repository.clone())))
            .collect();

        Self {
            live_pages,
            history: HistoryView::new(repository.clone(), ChartProfile::history(), pages.history.y_axis.clone()),
            sessions: RecordLifecycleController::new(RecordKind::Session, repository.clone()),
            products: RecordLifecycleController::new(RecordKind::Product, repository.clone()),
            maintenance: MaintenanceCounter::new(repository.clone()),
            alerts: AlertFeed::new(repository.clone()),
            nominal: NominalSessionConfig::new(repository),
        }
    }

    pub fn records(&self, kind: RecordKind) -> &RecordLifecycleController {
        match kind {
            RecordKind::Session => &self.sessions,
            RecordKind::Product => &self.products,
        }
    }
}
