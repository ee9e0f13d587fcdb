//! Default amenity catalogue seeded at startup

/// `(name, description, icon)`
pub const DEFAULT_AMENITIES: [(&str, &str, &str); 18] = [
    ("Swimming Pool", "Swimming pool facility", "🏊"),
    ("Gym/Fitness Center", "Fitness and workout facilities", "💪"),
    ("Parking", "Dedicated parking space", "🚗"),
    ("Security", "24/7 security services", "🔒"),
    ("Generator/Backup Power", "Backup power supply", "⚡"),
    ("Water Supply", "Reliable water supply", "💧"),
    ("Internet/WiFi", "Internet connectivity", "📶"),
    ("Elevator", "Elevator access", "🛗"),
    ("Balcony", "Private balcony", "🏠"),
    ("Garden/Green Space", "Garden or green areas", "🌳"),
    ("Laundry", "Laundry facilities", "👕"),
    ("Air Conditioning", "Air conditioning system", "❄️"),
    ("CCTV Surveillance", "CCTV security system", "📹"),
    ("Playground", "Children playground", "🛝"),
    ("Shopping Center Nearby", "Close to shopping facilities", "🛒"),
    ("Public Transport Access", "Easy access to public transport", "🚌"),
    ("Hospital/Clinic Nearby", "Close to medical facilities", "🏥"),
    ("School Nearby", "Close to educational institutions", "🏫"),
];
