/// Settings for one analysis session.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AnalysisConfig {
    /// Seed each document's root scope with the schema's global fields
    pub inject_globals: bool,
    /// Run the engine's own lint checks (modifier styles and types, unknown parameters)
    pub builtin_diagnostics: bool,
    /// Symbol count from which diagnostics handlers run in parallel
    pub parallel_diagnostics_threshold: usize,
    /// Maximum number of segments followed in a dotted path
    pub max_path_depth: usize,
    /// Characters that end a "meaningful word" around the caret
    pub parameter_separators: Vec<char>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            inject_globals: true,
            builtin_diagnostics: true,
            parallel_diagnostics_threshold: 256,
            max_path_depth: 16,
            parameter_separators: vec![':', '|', '=', '"', '\''],
        }
    }
}

impl AnalysisConfig {
    pub fn is_parameter_separator(&self, c: char) -> bool {
        self.parameter_separators.contains(&c)
    }
}
