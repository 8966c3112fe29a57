use super::state::PhaseName;

pub struct PhaseDefinition {
    pub name: PhaseName,
    pub display_name: &'static str,
}

pub static PHASES: &[PhaseDefinition] = &[
    PhaseDefinition {
        name: PhaseName::DataGeneration,
        display_name: "Data Generation",
    },
    PhaseDefinition {
        name: PhaseName::Forecasting,
        display_name: "Forecasting",
    },
    PhaseDefinition {
        name: PhaseName::Recommendations,
        display_name: "Recommendations",
    },
    PhaseDefinition {
        name: PhaseName::Reporting,
        display_name: "Reporting",
    },
];

pub fn display_name(phase: PhaseName) -> &'static str {
    PHASES
        .iter()
        .find(|p| p.name == phase)
        .map(|p| p.display_name)
        .unwrap_or("Unknown")
}
