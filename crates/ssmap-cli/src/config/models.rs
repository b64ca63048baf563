use ssmap::core::models::structure::AtomSelection;
use ssmap::core::parsers::AssignmentTool;
use ssmap::engine::config::AssignerConfig;

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub tool: AssignmentTool,
    pub selection: AtomSelection,
    pub assigner: AssignerConfig,
}
