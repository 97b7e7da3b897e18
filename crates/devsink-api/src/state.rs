use devsink_core::Ingestor;

#[derive(Debug, Clone)]
pub struct AppState {
    ingestor: Ingestor,
}

impl AppState {
    pub fn new(ingestor: Ingestor) -> Self {
        Self { ingestor }
    }

    pub fn ingestor(&self) -> &Ingestor {
        &self.ingestor
    }
}
