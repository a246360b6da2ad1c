//! Per-category structural contracts.
//!
//! One descriptor table per card category plus one for the normalized
//! preference object. The same `FieldSpec` list drives three things: the
//! schema description embedded in model prompts, output validation, and the
//! critical-field subset used by the fallback filter.

use crate::models::Category;

/// JSON shape expected for a single field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Number,
    TextList,
    OneOf(&'static [&'static str]),
}

/// One field of a registered schema
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    /// Short hint rendered into the prompt schema description
    pub doc: &'static str,
    /// A card missing this field is dropped by the fallback filter
    pub critical: bool,
    /// Must be present and non-null at validation time
    pub required: bool,
}

impl FieldSpec {
    const fn text(name: &'static str, doc: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Text,
            doc,
            critical: false,
            required: false,
        }
    }

    const fn number(name: &'static str, doc: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Number,
            doc,
            critical: false,
            required: false,
        }
    }

    const fn list(name: &'static str, doc: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::TextList,
            doc,
            critical: false,
            required: false,
        }
    }

    const fn one_of(
        name: &'static str,
        values: &'static [&'static str],
        doc: &'static str,
    ) -> Self {
        Self {
            name,
            kind: FieldKind::OneOf(values),
            doc,
            critical: false,
            required: false,
        }
    }

    const fn critical(mut self) -> Self {
        self.critical = true;
        self
    }

    const fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// Registry entry for one card category
#[derive(Debug, Clone, Copy)]
pub struct CardSchema {
    pub category: Category,
    pub fields: &'static [FieldSpec],
}

impl CardSchema {
    pub fn critical_fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().filter(|f| f.critical).map(|f| f.name)
    }

    /// Renders the schema description embedded in the generation prompt
    pub fn prompt_description(&self) -> String {
        render_description(self.fields)
    }
}

/// Registry entry for the normalized preference object
#[derive(Debug, Clone, Copy)]
pub struct PreferenceSchema {
    pub fields: &'static [FieldSpec],
}

impl PreferenceSchema {
    pub fn prompt_description(&self) -> String {
        render_description(self.fields)
    }
}

fn render_description(fields: &[FieldSpec]) -> String {
    let mut out = String::from("{\n");
    for field in fields {
        let kind = match field.kind {
            FieldKind::Text => "string".to_string(),
            FieldKind::Number => "number".to_string(),
            FieldKind::TextList => "[string]".to_string(),
            FieldKind::OneOf(values) => values
                .iter()
                .map(|v| format!("\"{}\"", v))
                .collect::<Vec<_>>()
                .join(" | "),
        };
        out.push_str(&format!("  \"{}\": {}", field.name, kind));
        if !field.doc.is_empty() {
            out.push_str(&format!("  // {}", field.doc));
        }
        out.push('\n');
    }
    out.push('}');
    out
}

const PRICE_RANGES: &[&str] = &["$", "$$", "$$$"];

pub const CATEGORY_NAMES: &[&str] = &[
    "Restaurants",
    "Takeout/Delivery",
    "Shows",
    "Movies",
    "Indoor Date Activities",
    "Outdoor Date Activities",
    "Things To Do Nearby",
    "Weekend Trip Ideas",
    "Games",
];

const RESTAURANT_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("name", "strictly the restaurant name").critical(),
    FieldSpec::text("description", "short 1-2 sentence description").critical(),
    FieldSpec::text("cuisine", "e.g. \"Italian\", \"Chinese\""),
    FieldSpec::one_of("priceRange", PRICE_RANGES, "").critical(),
    FieldSpec::text(
        "vibe",
        "1 noun and 3 key adjectives derived from the description, comma separated",
    ),
    FieldSpec::text("distance", "e.g. \"2 mi\"").critical(),
    FieldSpec::text("location", "street address or general area"),
    FieldSpec::number("rating", "e.g. 4.5").critical(),
];

const DELIVERY_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("name", "strictly the restaurant name").critical(),
    FieldSpec::text("description", "short 1-2 sentence description").critical(),
    FieldSpec::text("cuisine", "e.g. \"Italian\", \"Chinese\"").critical(),
    FieldSpec::one_of("priceRange", PRICE_RANGES, "").critical(),
    FieldSpec::text("deliveryTime", "e.g. \"30-40 Min\"").critical(),
    FieldSpec::text("deliveryPlatform", "e.g. \"Uber Eats, DoorDash\""),
    FieldSpec::number("rating", "e.g. 4.5"),
    FieldSpec::text("vibe", "comma separated keywords"),
    FieldSpec::text("location", "street address or general area"),
];

const SHOW_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("title", "").critical(),
    FieldSpec::text("description", "short 1-2 sentence description"),
    FieldSpec::text("genre", ""),
    FieldSpec::number("seasons", "e.g. 3"),
    FieldSpec::text("rating", "e.g. \"4.5\""),
    FieldSpec::text("platform", "e.g. Netflix, Hulu").critical(),
    FieldSpec::text("vibe", "comma separated keywords"),
    FieldSpec::number("releaseYear", "").critical(),
];

const MOVIE_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("title", "").critical(),
    FieldSpec::text("description", "short 1-2 sentence description"),
    FieldSpec::text("genre", ""),
    FieldSpec::text("rating", "e.g. \"4.5\""),
    FieldSpec::text("runtime", "e.g. \"120 mins\""),
    FieldSpec::number("releaseYear", "").critical(),
    FieldSpec::text("platform", "e.g. Netflix").critical(),
    FieldSpec::text("vibe", "comma separated keywords"),
];

const INDOOR_DATE_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("title", "").critical(),
    FieldSpec::text("description", "short 1-2 sentence description").critical(),
    FieldSpec::text("vibe", "comma separated keywords"),
    FieldSpec::text("cost", "e.g. \"$50-100\"").critical(),
    FieldSpec::text("duration", "e.g. \"1-2 Hrs\""),
    FieldSpec::list("supplies", "limit to 5 items"),
    FieldSpec::text("idealTime", "e.g. \"Evening\", \"Late Night\""),
    FieldSpec::one_of("messLevel", &["Clean", "Some Cleanup", "Very Messy"], ""),
];

const OUTDOOR_DATE_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("title", "").critical(),
    FieldSpec::text("description", "short 1-2 sentence description").critical(),
    FieldSpec::text("vibe", "comma separated keywords"),
    FieldSpec::text("cost", "e.g. \"$50-100\"").critical(),
    FieldSpec::text("distance", "e.g. \"2 mi\""),
    FieldSpec::text("duration", "e.g. \"2 hours\""),
    FieldSpec::text("bestTime", "e.g. \"day\", \"sunset\""),
    FieldSpec::text("locationType", "e.g. \"park\", \"beach\""),
];

const LOCAL_ACTIVITY_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("name", "").critical(),
    FieldSpec::text("description", "short 1-2 sentence description").critical(),
    FieldSpec::text("category", "e.g. \"museum\", \"arcade\""),
    FieldSpec::text("price", "e.g. \"$50-100\""),
    FieldSpec::text("distance", "e.g. \"2 mi\"").critical(),
    FieldSpec::number("rating", "e.g. 4.5"),
    FieldSpec::text("hours", "e.g. \"10am-8pm\""),
    FieldSpec::text("vibe", "comma separated keywords"),
    FieldSpec::text("location", "street address or general area"),
];

const WEEKEND_TRIP_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("destination", "").critical(),
    FieldSpec::text("description", "short 1-2 sentence description").critical(),
    FieldSpec::text("travelTime", "e.g. \"2 hours\""),
    FieldSpec::text("vibe", "comma separated keywords"),
    FieldSpec::text("cost", "e.g. \"$500-1000\"").critical(),
    FieldSpec::list("mainAttractions", "e.g. \"Roller Coasters, Water Rides\""),
    FieldSpec::text("season", "e.g. \"Summer\", \"Winter\""),
    FieldSpec::text("lodging", "e.g. \"Hotel\", \"Airbnb\""),
];

const GAME_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("title", "").critical(),
    FieldSpec::one_of("type", &["Board Game", "Video Game", "Card Game"], "").critical(),
    FieldSpec::text("description", "short 1-2 sentence description").critical(),
    FieldSpec::text("vibe", "comma separated keywords"),
    FieldSpec::text("playerCount", "e.g. \"2-4 Players\""),
    FieldSpec::text("averagePlaytime", "e.g. \"30 Min\""),
    FieldSpec::text("platform", "e.g. \"PS5, Xbox, PC\" (if video game)"),
    FieldSpec::one_of("difficulty", &["Easy", "Medium", "Hard"], ""),
];

const PREFERENCE_FIELDS: &[FieldSpec] = &[
    FieldSpec::one_of("category", CATEGORY_NAMES, "").required(),
    FieldSpec::text(
        "condensedInput",
        "concise sentence extracting key info from the user input",
    )
    .required(),
    FieldSpec::one_of("priceRange", PRICE_RANGES, ""),
    FieldSpec::text("vibe", ""),
    FieldSpec::number("location", "zip code, 0 if not provided"),
    FieldSpec::number("groupSize", ""),
    FieldSpec::text("userInput", "the original user input, verbatim").required(),
];

const RESTAURANT_SCHEMA: CardSchema = CardSchema {
    category: Category::Restaurants,
    fields: RESTAURANT_FIELDS,
};
const DELIVERY_SCHEMA: CardSchema = CardSchema {
    category: Category::Delivery,
    fields: DELIVERY_FIELDS,
};
const SHOW_SCHEMA: CardSchema = CardSchema {
    category: Category::Shows,
    fields: SHOW_FIELDS,
};
const MOVIE_SCHEMA: CardSchema = CardSchema {
    category: Category::Movies,
    fields: MOVIE_FIELDS,
};
const INDOOR_DATE_SCHEMA: CardSchema = CardSchema {
    category: Category::IndoorDates,
    fields: INDOOR_DATE_FIELDS,
};
const OUTDOOR_DATE_SCHEMA: CardSchema = CardSchema {
    category: Category::OutdoorDates,
    fields: OUTDOOR_DATE_FIELDS,
};
const LOCAL_ACTIVITY_SCHEMA: CardSchema = CardSchema {
    category: Category::LocalActivities,
    fields: LOCAL_ACTIVITY_FIELDS,
};
const WEEKEND_TRIP_SCHEMA: CardSchema = CardSchema {
    category: Category::WeekendTrips,
    fields: WEEKEND_TRIP_FIELDS,
};
const GAME_SCHEMA: CardSchema = CardSchema {
    category: Category::Games,
    fields: GAME_FIELDS,
};

const PREFERENCE_SCHEMA: PreferenceSchema = PreferenceSchema {
    fields: PREFERENCE_FIELDS,
};

/// Schema lookup, total over the closed category set.
///
/// Unknown category *strings* fail earlier, at `Category::from_str`, which is
/// where the registry's NotFound contract surfaces.
pub fn card_schema(category: Category) -> &'static CardSchema {
    match category {
        Category::Restaurants => &RESTAURANT_SCHEMA,
        Category::Delivery => &DELIVERY_SCHEMA,
        Category::Shows => &SHOW_SCHEMA,
        Category::Movies => &MOVIE_SCHEMA,
        Category::IndoorDates => &INDOOR_DATE_SCHEMA,
        Category::OutdoorDates => &OUTDOOR_DATE_SCHEMA,
        Category::LocalActivities => &LOCAL_ACTIVITY_SCHEMA,
        Category::WeekendTrips => &WEEKEND_TRIP_SCHEMA,
        Category::Games => &GAME_SCHEMA,
    }
}

/// Schema for the category-independent normalization stage
pub fn preference_schema() -> &'static PreferenceSchema {
    &PREFERENCE_SCHEMA
}
