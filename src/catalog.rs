//! Restriction catalog — static reference data for known dietary restrictions.

/// Form option for a restriction that is not in the catalog.
pub const OTHER_OPTION: &str = "Outra";

/// A known dietary restriction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestrictionEntry {
    pub key: &'static str,
    pub description: &'static str,
    pub common_ingredients: &'static [&'static str],
}

static CATALOG: &[RestrictionEntry] = &[
    RestrictionEntry {
        key: "Lactose",
        description: "Intolerância à lactose, o açúcar natural do leite e seus derivados.",
        common_ingredients: &["leite", "queijo", "manteiga", "creme de leite", "iogurte", "soro de leite"],
    },
    RestrictionEntry {
        key: "Glúten",
        description: "Doença celíaca ou sensibilidade ao glúten, proteína presente no trigo, centeio e cevada.",
        common_ingredients: &["trigo", "centeio", "cevada", "malte", "farinha de trigo", "aveia contaminada"],
    },
    RestrictionEntry {
        key: "Amendoim",
        description: "Alergia a amendoim, que pode causar reações graves mesmo em pequenas quantidades.",
        common_ingredients: &["amendoim", "pasta de amendoim", "óleo de amendoim", "paçoca"],
    },
    RestrictionEntry {
        key: "Frutos do mar",
        description: "Alergia a crustáceos e moluscos.",
        common_ingredients: &["camarão", "lagosta", "caranguejo", "lula", "polvo", "mexilhão"],
    },
    RestrictionEntry {
        key: "Ovo",
        description: "Alergia às proteínas da clara ou da gema do ovo.",
        common_ingredients: &["ovo", "albumina", "maionese", "merengue", "lecitina de ovo"],
    },
    RestrictionEntry {
        key: "Soja",
        description: "Alergia à soja e às suas proteínas.",
        common_ingredients: &["soja", "tofu", "molho shoyu", "lecitina de soja", "proteína texturizada"],
    },
    RestrictionEntry {
        key: "Vegano",
        description: "Dieta que exclui todos os produtos de origem animal.",
        common_ingredients: &["carne", "peixe", "leite", "ovo", "mel", "gelatina"],
    },
    RestrictionEntry {
        key: "Vegetariano",
        description: "Dieta que exclui carnes e peixes.",
        common_ingredients: &["carne bovina", "frango", "porco", "peixe", "caldo de carne", "gelatina"],
    },
];

/// Look up a restriction by its exact key.
pub fn lookup(key: &str) -> Option<&'static RestrictionEntry> {
    CATALOG.iter().find(|entry| entry.key == key)
}

/// All catalog entries in display order.
pub fn entries() -> &'static [RestrictionEntry] {
    CATALOG
}

/// Catalog keys in display order.
pub fn keys() -> impl Iterator<Item = &'static str> {
    CATALOG.iter().map(|entry| entry.key)
}

/// Options offered by the onboarding multi-select: catalog keys, then "Outra".
pub fn form_options() -> Vec<&'static str> {
    keys().chain(std::iter::once(OTHER_OPTION)).collect()
}
