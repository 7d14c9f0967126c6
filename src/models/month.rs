/// The fixed French calendar labels, in canonical chronological order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonthName {
    Janvier,
    Fevrier,
    Mars,
    Avril,
    Mai,
    Juin,
    Juillet,
    Aout,
    Septembre,
    Octobre,
    Novembre,
    Decembre,
}

impl MonthName {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Janvier => "Janvier",
            Self::Fevrier => "Février",
            Self::Mars => "Mars",
            Self::Avril => "Avril",
            Self::Mai => "Mai",
            Self::Juin => "Juin",
            Self::Juillet => "Juillet",
            Self::Aout => "Août",
            Self::Septembre => "Septembre",
            Self::Octobre => "Octobre",
            Self::Novembre => "Novembre",
            Self::Decembre => "Décembre",
        }
    }

    /// Parse a label, accepting unaccented spellings and any casing.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "janvier" => Some(Self::Janvier),
            "février" | "fevrier" => Some(Self::Fevrier),
            "mars" => Some(Self::Mars),
            "avril" => Some(Self::Avril),
            "mai" => Some(Self::Mai),
            "juin" => Some(Self::Juin),
            "juillet" => Some(Self::Juillet),
            "août" | "aout" => Some(Self::Aout),
            "septembre" => Some(Self::Septembre),
            "octobre" => Some(Self::Octobre),
            "novembre" => Some(Self::Novembre),
            "décembre" | "decembre" => Some(Self::Decembre),
            _ => None,
        }
    }

    /// Position in the calendar, 0-based (Janvier = 0).
    pub fn index(&self) -> usize {
        Self::all().iter().position(|m| m == self).unwrap_or(0)
    }

    pub fn all() -> &'static [MonthName] {
        &[
            Self::Janvier,
            Self::Fevrier,
            Self::Mars,
            Self::Avril,
            Self::Mai,
            Self::Juin,
            Self::Juillet,
            Self::Aout,
            Self::Septembre,
            Self::Octobre,
            Self::Novembre,
            Self::Decembre,
        ]
    }
}

impl std::fmt::Display for MonthName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One calendar period of the dues ledger, e.g. "Janvier 2024".
#[derive(Debug, Clone)]
pub struct Month {
    pub id: Option<i64>,
    pub name: MonthName,
    pub year: i32,
}

impl Month {
    pub fn new(name: MonthName, year: i32) -> Self {
        Self {
            id: None,
            name,
            year,
        }
    }

    pub fn label(&self) -> String {
        format!("{} {}", self.name, self.year)
    }
}

impl std::fmt::Display for Month {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
