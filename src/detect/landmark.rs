/// Hand landmark ids (21-point hand topology).
pub mod hand {
    pub const WRIST: u8 = 0;
    pub const THUMB_CMC: u8 = 1;
    pub const THUMB_MCP: u8 = 2;
    pub const THUMB_IP: u8 = 3;
    pub const THUMB_TIP: u8 = 4;
    pub const INDEX_FINGER_MCP: u8 = 5;
    pub const INDEX_FINGER_PIP: u8 = 6;
    pub const INDEX_FINGER_DIP: u8 = 7;
    pub const INDEX_FINGER_TIP: u8 = 8;
    pub const MIDDLE_FINGER_MCP: u8 = 9;
    pub const MIDDLE_FINGER_PIP: u8 = 10;
    pub const MIDDLE_FINGER_DIP: u8 = 11;
    pub const MIDDLE_FINGER_TIP: u8 = 12;
    pub const RING_FINGER_MCP: u8 = 13;
    pub const RING_FINGER_PIP: u8 = 14;
    pub const RING_FINGER_DIP: u8 = 15;
    pub const RING_FINGER_TIP: u8 = 16;
    pub const PINKY_MCP: u8 = 17;
    pub const PINKY_PIP: u8 = 18;
    pub const PINKY_DIP: u8 = 19;
    pub const PINKY_TIP: u8 = 20;

    /// Number of points a detector reports for one hand.
    pub const LANDMARK_COUNT: usize = 21;
}

/// One tracked point on a detected hand, in frame pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Landmark {
    pub id: u8,
    pub x: i32,
    pub y: i32,
}

impl Landmark {
    pub fn new(id: u8, x: i32, y: i32) -> Self {
        Self { id, x, y }
    }
}

/// Landmarks for the single hand found in a frame. Empty means no hand.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LandmarkSet {
    points: Vec<Landmark>,
}

impl LandmarkSet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_points(points: Vec<Landmark>) -> Self {
        Self { points }
    }

    /// A full 21-point hand with every point at `rest`, then the thumb and
    /// index tips moved to the given positions.
    pub fn pinch(thumb_tip: (i32, i32), index_tip: (i32, i32), rest: (i32, i32)) -> Self {
        let points = (0..hand::LANDMARK_COUNT as u8)
            .map(|id| match id {
                hand::THUMB_TIP => Landmark::new(id, thumb_tip.0, thumb_tip.1),
                hand::INDEX_FINGER_TIP => Landmark::new(id, index_tip.0, index_tip.1),
                _ => Landmark::new(id, rest.0, rest.1),
            })
            .collect();
        Self { points }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Look up a landmark by id.
    ///
    /// Detectors normally report points in id order, so the positional slot
    /// is checked first before falling back to a scan.
    pub fn get(&self, id: u8) -> Option<&Landmark> {
        match self.points.get(id as usize) {
            Some(lm) if lm.id == id => Some(lm),
            _ => self.points.iter().find(|lm| lm.id == id),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Landmark> {
        self.points.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_finds_by_id_not_position() {
        let set = LandmarkSet::from_points(vec![
            Landmark::new(hand::INDEX_FINGER_TIP, 10, 20),
            Landmark::new(hand::THUMB_TIP, 30, 40),
        ]);
        assert_eq!(set.get(hand::THUMB_TIP), Some(&Landmark::new(4, 30, 40)));
        assert_eq!(set.get(hand::INDEX_FINGER_TIP), Some(&Landmark::new(8, 10, 20)));
        assert_eq!(set.get(hand::WRIST), None);
    }

    #[test]
    fn pinch_builds_full_hand() {
        let set = LandmarkSet::pinch((5, 6), (7, 8), (0, 0));
        assert_eq!(set.len(), hand::LANDMARK_COUNT);
        assert_eq!(set.get(hand::THUMB_TIP).map(|lm| (lm.x, lm.y)), Some((5, 6)));
        assert_eq!(set.get(hand::INDEX_FINGER_TIP).map(|lm| (lm.x, lm.y)), Some((7, 8)));
        assert_eq!(set.get(hand::PINKY_TIP).map(|lm| (lm.x, lm.y)), Some((0, 0)));
    }
}
