//! The catalog of elicitation frameworks the agent can structure ideas with.

pub const AUTO: &str = "Auto selection (Let the agent decide)";

pub struct Framework {
    pub name: &'static str,
    pub components: &'static str,
    pub disciplines: &'static str,
}

impl Framework {
    /// The label embedded verbatim into the system prompt.
    pub fn label(&self) -> String {
        format!("{} | {} | {}", self.name, self.components, self.disciplines)
    }
}

pub const CATALOG: [Framework; 24] = [
    Framework {
        name: "BeHEMoTh",
        components: "Be: behavior of interest, H: health context, E: exclusions, MoTh: models or theories",
        disciplines: "Questions about theories, health behavior",
    },
    Framework {
        name: "CHIP",
        components: "Context, How, Issues, Population",
        disciplines: "Psychology, qualitative research",
    },
    Framework {
        name: "CIMO",
        components: "Context, Intervention, Mechanisms, Outcomes",
        disciplines: "Management, business, administration",
    },
    Framework {
        name: "CLIP",
        components: "Client group, Location of provided service, Improvement/Information/Innovation, Professionals",
        disciplines: "Librarianship, management, policy",
    },
    Framework {
        name: "COPES",
        components: "Client-Oriented, Practical, Evidence, Search",
        disciplines: "Social work, health care, nursing",
    },
    Framework {
        name: "ECLIPSE",
        components: "Expectation, Client, Location, Impact, Professionals, Service",
        disciplines: "Management, services, policy, social care",
    },
    Framework {
        name: "PEO",
        components: "Population, Exposure, Outcome",
        disciplines: "Qualitative research",
    },
    Framework {
        name: "PECODR",
        components: "Patient/population/problem, Exposure, Comparison, Outcome, Duration, Results",
        disciplines: "Medicine, clinical research",
    },
    Framework {
        name: "PerSPECTiF",
        components: "Perspective, Setting, Phenomenon of interest/Problem, Environment, Comparison, Time/Timing, Findings",
        disciplines: "Qualitative research",
    },
    Framework {
        name: "PESICO",
        components: "Person, Environments, Stakeholders, Intervention, Comparison, Outcome",
        disciplines: "Augmentative and alternative communication",
    },
    Framework {
        name: "PICO",
        components: "Patient, Intervention, Comparison, Outcome",
        disciplines: "Clinical medicine, evidence-based practice",
    },
    Framework {
        name: "PICO+",
        components: "Patient, Intervention, Comparison, Outcome, +context, patient values, preferences",
        disciplines: "Occupational therapy",
    },
    Framework {
        name: "PICOC",
        components: "Patient, Intervention, Comparison, Outcome, Context",
        disciplines: "Social sciences",
    },
    Framework {
        name: "PICOS",
        components: "Patient, Intervention, Comparison, Outcome, Study Type",
        disciplines: "Medicine, systematic reviews",
    },
    Framework {
        name: "PICOT",
        components: "Patient, Intervention, Comparison, Outcome, Time",
        disciplines: "Education, health care",
    },
    Framework {
        name: "PICO (for diagnostic tests)",
        components: "Patient/participants/population, Index tests, Comparator/reference tests, Outcome",
        disciplines: "Diagnostic questions, clinical research",
    },
    Framework {
        name: "PIPOH",
        components: "Population, Intervention, Professionals, Outcomes, Health care setting/context",
        disciplines: "Screening, health care",
    },
    Framework {
        name: "PCC",
        components: "Population, Concept, Context",
        disciplines: "Scoping reviews",
    },
    Framework {
        name: "PPICO",
        components: "Population (with two descriptors), Intervention, Comparison, Outcome",
        disciplines: "Complex population studies, clinical research",
    },
    Framework {
        name: "PI_O",
        components: "Population, Intervention, Outcome (without comparison)",
        disciplines: "Clinical research, no comparison needed",
    },
    Framework {
        name: "ProPheT",
        components: "Problem, Phenomenon of interest, Time",
        disciplines: "Social sciences, qualitative, library science",
    },
    Framework {
        name: "SPICE",
        components: "Setting, Perspective, Interest, Comparison, Evaluation",
        disciplines: "Qualitative research, evaluating outcomes",
    },
    Framework {
        name: "SPIDER",
        components: "Sample, Phenomenon of interest, Design, Evaluation, Research type",
        disciplines: "Health, qualitative or mixed methods research",
    },
    Framework {
        name: "WWH",
        components: "Who, What, How",
        disciplines: "General research, not discipline-specific",
    },
];

/// All selectable options, auto first, in catalog order.
pub fn options() -> Vec<String> {
    std::iter::once(AUTO.to_string())
        .chain(CATALOG.iter().map(Framework::label))
        .collect()
}

/// Resolve user input to a framework label: "auto"/"0", a 1-based catalog
/// index, or a case-insensitive framework name.
pub fn resolve(input: &str) -> Option<String> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if input.eq_ignore_ascii_case("auto") {
        return Some(AUTO.to_string());
    }

    if let Ok(index) = input.parse::<usize>() {
        if index == 0 {
            return Some(AUTO.to_string());
        }
        return CATALOG.get(index - 1).map(Framework::label);
    }

    CATALOG
        .iter()
        .find(|f| f.name.eq_ignore_ascii_case(input))
        .map(Framework::label)
}

pub fn is_auto(framework: &str) -> bool {
    framework.starts_with("Auto")
}
