//! Known difficulty classes for roll nodes
//!
//! Roll nodes reference a difficulty class by GUID. Only the classes listed
//! here are accepted when decoding; anything else falls back to the first
//! entry.

/// Info about a difficulty class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DifficultyClassInfo {
    /// `DifficultyClassID` GUID
    pub id: &'static str,
    /// Human-readable name (e.g., "Act1 Medium")
    pub name: &'static str,
    /// Difficulty value (the actual DC number)
    pub difficulty: i32,
}

const fn dc(id: &'static str, name: &'static str, difficulty: i32) -> DifficultyClassInfo {
    DifficultyClassInfo {
        id,
        name,
        difficulty,
    }
}

/// All difficulty classes, grouped by act.
pub const DIFFICULTY_CLASSES: &[DifficultyClassInfo] = &[
    // Act 1
    dc("4dfcb0ff-e02a-4efd-b132-77dfd956055e", "Act1 Zero", 0),
    dc("2728289e-841d-4273-a29a-f24ae9f8c4fb", "Act1 Negligible", 2),
    dc("8d398021-34e0-40b9-b7b2-0445f38a4c0b", "Act1 Very Easy", 5),
    dc("31e92da6-bac9-46f7-af99-5f33d98fd4f0", "Act1 Easy", 7),
    dc("fa621d38-6f83-4e42-a55c-6aa651a75d46", "Act1 Medium", 10),
    dc("5e7ff0e9-6c80-459c-a636-3a3e8417a61a", "Act1 Challenging", 12),
    dc("831e1fbe-428d-4f4d-bd17-4206d6efea35", "Act1 Hard", 15),
    dc("8986db4d-09af-46ee-9781-ac88ec10fa0e", "Act1 Very Hard", 18),
    dc("ea049218-36a8-4440-a3fc-f3019a57c86b", "Act1 Nearly Impossible", 20),
    // Act 2
    dc("9d1f2171-fef1-4c03-9e83-523485174c46", "Act2 Very Easy", 6),
    dc("0d9484eb-f680-4a33-853d-46fda64883f2", "Act2 Easy", 10),
    dc("89f0acd4-346f-479d-8b7a-1a3eb5382f6d", "Act2 Medium", 14),
    dc("c44bfd7d-84de-4568-9c57-a059b8df5435", "Act2 Challenging", 16),
    dc("91fb3598-dd68-4fa8-a306-2c7284709b08", "Act2 Hard", 18),
    dc("f3aa825b-785e-4f4a-90af-565c7e943609", "Act2 Very Hard", 21),
    dc("753ed8df-b5dc-4584-b9fa-de18c4c956b2", "Act2 Extra Hard", 24),
    dc("52918812-bc1c-43b5-881a-58443902f5fa", "Act2 Nearly Impossible", 30),
    // Act 3
    dc("b9cea18d-f40a-444d-a692-76582a69130c", "Act3 Very Easy", 7),
    dc("5028066b-6ea0-4a6a-9e3e-53bee62559a7", "Act3 Easy", 10),
    dc("77cee1c4-384a-4217-b670-67db3c7add57", "Act3 Medium", 15),
    dc("96bc76f2-0b2e-4a79-854f-e4971a772c36", "Act3 Challenging", 18),
    dc("6298329e-255c-4826-9209-e911873b64e7", "Act3 Hard", 20),
    dc("60916b01-ba4c-418e-9f30-19a669704b4d", "Act3 Very Hard", 25),
    dc("7bf230a0-b68a-4c79-a785-79b498d6c36b", "Act3 Nearly Impossible", 30),
];

/// Difficulty class assigned to newly created roll nodes (Act1 Easy).
pub const DEFAULT_DIFFICULTY_CLASS_ID: &str = "31e92da6-bac9-46f7-af99-5f33d98fd4f0";

/// Look up a difficulty class by GUID.
#[must_use]
pub fn find_difficulty_class(id: &str) -> Option<&'static DifficultyClassInfo> {
    DIFFICULTY_CLASSES.iter().find(|info| info.id == id)
}

/// The class used when a decoded id is not recognized.
#[must_use]
pub fn fallback_difficulty_class() -> &'static DifficultyClassInfo {
    &DIFFICULTY_CLASSES[0]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_known() {
        let info = find_difficulty_class(DEFAULT_DIFFICULTY_CLASS_ID).unwrap();
        assert_eq!(info.name, "Act1 Easy");
        assert_eq!(info.difficulty, 7);
    }

    #[test]
    fn test_unknown_id() {
        assert!(find_difficulty_class("not-a-dc").is_none());
        assert_eq!(fallback_difficulty_class().difficulty, 0);
    }
}
