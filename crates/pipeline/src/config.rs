use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub vision: VisionConfig,
    pub warehouse: WarehouseConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisionConfig {
    pub endpoint: String,
    pub api_key: Option<String>,
    pub label_max_results: u32,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WarehouseConfig {
    pub endpoint: String,
    pub project_id: String,
    pub dataset_id: String,
    pub table_id: String,
    pub auth_token: Option<String>,
    pub request_timeout_secs: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            vision: VisionConfig {
                endpoint: annotate::client::DEFAULT_ENDPOINT.to_string(),
                api_key: None,
                label_max_results: 10,
                request_timeout_secs: 30,
            },
            warehouse: WarehouseConfig {
                endpoint: warehouse::sink::DEFAULT_ENDPOINT.to_string(),
                project_id: String::new(),
                dataset_id: String::new(),
                table_id: String::new(),
                auth_token: None,
                request_timeout_secs: 30,
            },
        }
    }
}
