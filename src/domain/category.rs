/// Point-of-interest categories that can be searched around an origin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Restaurant,
    FastFood,
    School,
    Hotel,
    Supermarket,
    Atm,
    Police,
    Park,
    Museum,
    Cinema,
    Gym,
    Library,
    GasStation,
    Church,
    Butcher,
    Electronics,
}

impl Category {
    pub const ALL: [Category; 16] = [
        Category::Restaurant,
        Category::FastFood,
        Category::School,
        Category::Hotel,
        Category::Supermarket,
        Category::Atm,
        Category::Police,
        Category::Park,
        Category::Museum,
        Category::Cinema,
        Category::Gym,
        Category::Library,
        Category::GasStation,
        Category::Church,
        Category::Butcher,
        Category::Electronics,
    ];

    /// Resolve a form key to a category.
    ///
    /// Unknown keys resolve to [`Category::Restaurant`] rather than being
    /// rejected; existing links and forms depend on that fallback.
    pub fn from_key(key: &str) -> Category {
        match key.trim().to_ascii_lowercase().as_str() {
            "restaurant" => Category::Restaurant,
            "fast_food" => Category::FastFood,
            "school" => Category::School,
            "hotel" => Category::Hotel,
            "supermarket" => Category::Supermarket,
            "atm" => Category::Atm,
            "police" => Category::Police,
            "park" => Category::Park,
            "museum" => Category::Museum,
            "cinema" => Category::Cinema,
            "gym" => Category::Gym,
            "library" => Category::Library,
            "gas_station" => Category::GasStation,
            "church" => Category::Church,
            "butcher" => Category::Butcher,
            "electronics" => Category::Electronics,
            _ => Category::Restaurant,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Category::Restaurant => "restaurant",
            Category::FastFood => "fast_food",
            Category::School => "school",
            Category::Hotel => "hotel",
            Category::Supermarket => "supermarket",
            Category::Atm => "atm",
            Category::Police => "police",
            Category::Park => "park",
            Category::Museum => "museum",
            Category::Cinema => "cinema",
            Category::Gym => "gym",
            Category::Library => "library",
            Category::GasStation => "gas_station",
            Category::Church => "church",
            Category::Butcher => "butcher",
            Category::Electronics => "electronics",
        }
    }

    /// Overpass QL tag filter selecting this category
    pub fn filter(self) -> &'static str {
        match self {
            Category::Restaurant => r#"["amenity"="restaurant"]"#,
            Category::FastFood => r#"["amenity"="fast_food"]"#,
            Category::School => r#"["amenity"="school"]"#,
            Category::Hotel => r#"["tourism"="hotel"]"#,
            Category::Supermarket => r#"["shop"="supermarket"]"#,
            Category::Atm => r#"["amenity"="atm"]"#,
            Category::Police => r#"["amenity"="police"]"#,
            Category::Park => r#"["leisure"="park"]"#,
            Category::Museum => r#"["tourism"="museum"]"#,
            Category::Cinema => r#"["amenity"="cinema"]"#,
            Category::Gym => r#"["leisure"="fitness_centre"]"#,
            Category::Library => r#"["amenity"="library"]"#,
            Category::GasStation => r#"["amenity"="fuel"]"#,
            Category::Church => r#"["amenity"="place_of_worship"]["religion"="christian"]"#,
            Category::Butcher => r#"["shop"="butcher"]"#,
            Category::Electronics => r#"["shop"="electronics"]"#,
        }
    }

    pub fn label(self) -> String {
        category_label(self.key())
    }
}

/// Human-readable form of a category key: underscores become spaces and
/// every word is capitalized ("gas_station" -> "Gas Station").
pub fn category_label(key: &str) -> String {
    key.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(|c| c.to_lowercase()))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
