//! Cosmetic reward row: five slots that fill with flowers as work sessions complete.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt;

pub const GARDEN_SIZE: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flower {
    CherryBlossom,
    WhiteFlower,
    Lotus,
    Rosette,
    Rose,
    WiltedRose,
    Hibiscus,
    Sunflower,
    Blossom,
    Tulip,
    Hyacinth,
    Monkey,
    Rabbit,
    Sloth,
    Egg,
    Frog,
    Panda,
}

impl Flower {
    pub const ALL: [Flower; 17] = [
        Flower::CherryBlossom,
        Flower::WhiteFlower,
        Flower::Lotus,
        Flower::Rosette,
        Flower::Rose,
        Flower::WiltedRose,
        Flower::Hibiscus,
        Flower::Sunflower,
        Flower::Blossom,
        Flower::Tulip,
        Flower::Hyacinth,
        Flower::Monkey,
        Flower::Rabbit,
        Flower::Sloth,
        Flower::Egg,
        Flower::Frog,
        Flower::Panda,
    ];

    pub fn glyph(self) -> &'static str {
        match self {
            Flower::CherryBlossom => "🌸",
            Flower::WhiteFlower => "💮",
            Flower::Lotus => "🪷",
            Flower::Rosette => "🏵️",
            Flower::Rose => "🌹",
            Flower::WiltedRose => "🥀",
            Flower::Hibiscus => "🌺",
            Flower::Sunflower => "🌻",
            Flower::Blossom => "🌼",
            Flower::Tulip => "🌷",
            Flower::Hyacinth => "🪻",
            Flower::Monkey => "🐵",
            Flower::Rabbit => "🐰",
            Flower::Sloth => "🦥",
            Flower::Egg => "🥚",
            Flower::Frog => "🐸",
            Flower::Panda => "🐼",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Slot {
    #[default]
    Seedling,
    Flower(Flower),
}

impl Slot {
    pub fn glyph(self) -> &'static str {
        match self {
            Slot::Seedling => "🌱",
            Slot::Flower(flower) => flower.glyph(),
        }
    }
}

/// Uniform choice of an index in `0..upper`. Injected so tests can script outcomes.
pub trait SlotPicker: Send {
    fn pick(&mut self, upper: usize) -> usize;
}

pub struct RandomPicker {
    rng: StdRng,
}

impl RandomPicker {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl Default for RandomPicker {
    fn default() -> Self {
        Self::new()
    }
}

impl SlotPicker for RandomPicker {
    fn pick(&mut self, upper: usize) -> usize {
        self.rng.gen_range(0..upper)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Garden {
    slots: [Slot; GARDEN_SIZE],
    session_count: u64,
}

impl Garden {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slots(&self) -> &[Slot; GARDEN_SIZE] {
        &self.slots
    }

    pub fn session_count(&self) -> u64 {
        self.session_count
    }

    pub fn flower_count(&self) -> usize {
        self.slots.iter().filter(|slot| **slot != Slot::Seedling).count()
    }

    /// Plants a random flower on a random seedling; once every slot has
    /// flowered, a random slot is replanted instead.
    pub fn record_completed_session(&mut self, picker: &mut dyn SlotPicker) {
        self.session_count += 1;

        let seedlings: Vec<usize> = self
            .slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| **slot == Slot::Seedling)
            .map(|(index, _)| index)
            .collect();

        let position = if seedlings.is_empty() {
            picker.pick(GARDEN_SIZE) % GARDEN_SIZE
        } else {
            seedlings[picker.pick(seedlings.len()) % seedlings.len()]
        };
        let flower = Flower::ALL[picker.pick(Flower::ALL.len()) % Flower::ALL.len()];

        self.slots[position] = Slot::Flower(flower);
    }
}

impl fmt::Display for Garden {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for slot in &self.slots {
            f.write_str(slot.glyph())?;
        }
        Ok(())
    }
}
