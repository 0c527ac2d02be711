use rand::seq::SliceRandom;

/// A named starting obstacle layout. The hub consumes a pattern purely as a
/// value: an initial seed grid plus a difficulty label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GamePattern {
    pub id: u32,
    pub name: &'static str,
    pub description: &'static str,
    /// 1 (easiest) through 5.
    pub difficulty: u8,
    pub rle: &'static str,
    pub min_grid_size: (usize, usize),
    pub tactical_note: &'static str,
}

pub const PATTERNS: &[GamePattern] = &[
    GamePattern {
        id: 1,
        name: "Distributed Defense",
        description: "Multiple defensive positions spread across the grid",
        difficulty: 1,
        rle: "3o2b3o2b3o$b2ob2ob2o5$3o2b3o2b3o$3b2ob2ob2o!",
        min_grid_size: (20, 20),
        tactical_note: "Learn to coordinate across multiple positions",
    },
    GamePattern {
        id: 2,
        name: "Network Defense",
        description: "Interconnected defensive networks",
        difficulty: 2,
        rle: "3o2bo2b3o$o4bo4bo$3o2bo2b3o5$2o2b3o2b2o$o2b5o2bo$2o2b3o2b2o!",
        min_grid_size: (20, 20),
        tactical_note: "Practice managing interconnected defensive zones",
    },
    GamePattern {
        id: 3,
        name: "Grid Control",
        description: "Strategic control points across the grid",
        difficulty: 2,
        rle: "2o2b4o$2ob6o$4o2b2o3$b2o2b2o2b2o$3o2b2o2b3o$b2o2b2o2b2o3$2o2b4o$2ob6o$4o2b2o!",
        min_grid_size: (25, 25),
        tactical_note: "Control multiple strategic points",
    },
    GamePattern {
        id: 4,
        name: "Complex Grid",
        description: "Multiple fortified positions with support",
        difficulty: 3,
        rle: "3o2b3o2b3o$o2b2ob2o2bo$3o2b3o2b3o4$2b4o4b$bo6bo$bo6bo$2b4o4b4$3o2b3o2b3o$o2b2ob2o2bo$3o2b3o2b3o!",
        min_grid_size: (30, 30),
        tactical_note: "Coordinate attacks across multiple strongpoints",
    },
    GamePattern {
        id: 5,
        name: "Grid Sectors",
        description: "Multiple defensive sectors",
        difficulty: 3,
        rle: "2o2b2o2b2o2b2o$2ob2ob2ob2ob2o$2o2b2o2b2o2b2o4$b3o4b3o$bo2b4o2bo$b3o4b3o4$2o2b2o2b2o2b2o$2ob2ob2ob2ob2o$2o2b2o2b2o2b2o!",
        min_grid_size: (30, 30),
        tactical_note: "Manage multiple defensive sectors",
    },
    GamePattern {
        id: 6,
        name: "Advanced Grid",
        description: "Complex grid-wide defensive system",
        difficulty: 4,
        rle: "3o2b4o2b3o$o2b2ob2ob2o2bo$3o2b4o2b3o3$2b6o6b$bo2b4o2bo$bo2b4o2bo$2b6o6b3$3o2b4o2b3o$o2b2ob2ob2o2bo$3o2b4o2b3o!",
        min_grid_size: (35, 35),
        tactical_note: "Advanced grid control tactics",
    },
    GamePattern {
        id: 7,
        name: "Fortress Network",
        description: "Network of fortified positions",
        difficulty: 4,
        rle: "4o2b4o2b4o$o3bob4obo3bo$4o2b4o2b4o3$2b3o6b3o$bo2b8o2bo$bo2b8o2bo$2b3o6b3o3$4o2b4o2b4o$o3bob4obo3bo$4o2b4o2b4o!",
        min_grid_size: (35, 35),
        tactical_note: "Coordinate attacks on multiple fortified positions",
    },
    GamePattern {
        id: 8,
        name: "Elite Grid",
        description: "Complex grid-wide elite defensive system",
        difficulty: 5,
        rle: "3o2b5o2b3o$o2b2ob3ob2o2bo$3o2b5o2b3o3$2b8o8b$bo3b6o3bo$bo3b6o3bo$2b8o8b3$3o2b5o2b3o$o2b2ob3ob2o2bo$3o2b5o2b3o4$b4o6b4o$2o2b8o2b2o$b4o6b4o!",
        min_grid_size: (40, 40),
        tactical_note: "Master complex grid-wide tactics",
    },
    GamePattern {
        id: 9,
        name: "Master Grid",
        description: "Ultimate grid-wide challenge",
        difficulty: 5,
        rle: "4o2b6o2b4o$o3bob6obo3bo$4o2b6o2b4o3$2b4o8b4o$bo2b12o2bo$bo2b12o2bo$2b4o8b4o3$4o2b6o2b4o$o3bob6obo3bo$4o2b6o2b4o4$b5o8b5o$2o3b10o3b2o$b5o8b5o!",
        min_grid_size: (45, 45),
        tactical_note: "Ultimate test of grid control",
    },
];

pub fn pattern_by_id(id: u32) -> Option<&'static GamePattern> {
    PATTERNS.iter().find(|p| p.id == id)
}

/// Pick a random pattern whose difficulty falls within the band. `None`
/// when the band matches nothing.
pub fn random_pattern(min_difficulty: u8, max_difficulty: u8) -> Option<&'static GamePattern> {
    let candidates: Vec<&GamePattern> = PATTERNS
        .iter()
        .filter(|p| (min_difficulty..=max_difficulty).contains(&p.difficulty))
        .collect();
    candidates.choose(&mut rand::thread_rng()).copied()
}

/// Width and height a pattern's RLE occupies.
pub fn pattern_dimensions(rle: &str) -> (usize, usize) {
    let (mut max_x, mut max_y) = (0usize, 0usize);
    let (mut x, mut y) = (0usize, 0usize);
    let mut count = String::new();

    for ch in rle.chars() {
        if ch.is_ascii_digit() {
            count.push(ch);
            continue;
        }
        let repeat = count.parse::<usize>().unwrap_or(1);
        count.clear();

        match ch {
            '$' => {
                y += repeat;
                x = 0;
            }
            'b' | 'o' => x += repeat,
            '!' => break,
            _ => {}
        }
        max_x = max_x.max(x);
        max_y = max_y.max(y);
    }

    (max_x, max_y + 1)
}
