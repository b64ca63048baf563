pub struct DefaultsConfig {
    pub tool: String,
    pub selection: String,
    pub stride_executable: String,
    pub dssp_executable: String,
    pub timeout_secs: u64,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            tool: "stride".to_string(),
            selection: "protein".to_string(),
            stride_executable: "stride".to_string(),
            dssp_executable: "mkdssp".to_string(),
            timeout_secs: 600,
        }
    }
}
