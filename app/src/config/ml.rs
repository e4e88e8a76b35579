use kit::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct MlConfig {
    /// Directory holding `time_rf.json`, `time_gb.json` and `success_clf.json`
    pub model_dir: PathBuf,
}

impl MlConfig {
    pub fn from_env() -> Self {
        Self {
            model_dir: PathBuf::from(env("ML_MODEL_DIR", "storage/models".to_string())),
        }
    }
}
