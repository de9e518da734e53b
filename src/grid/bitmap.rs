use super::slot::DAYS_PER_WEEK;

/// Canonical state of one half-hour cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Available,
    Unavailable,
}

impl Cell {
    /// The opposite cell value.
    pub fn flipped(self) -> Cell {
        match self {
            Cell::Available => Cell::Unavailable,
            Cell::Unavailable => Cell::Available,
        }
    }

    fn to_wire(self) -> char {
        match self {
            Cell::Available => '1',
            Cell::Unavailable => '0',
        }
    }

    fn from_wire(c: char) -> Option<Cell> {
        match c {
            '1' => Some(Cell::Available),
            '0' => Some(Cell::Unavailable),
            _ => None,
        }
    }
}

/// One participant's weekly availability: one cell per half-hour slot
/// across Monday-Friday and the schedule's hour range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilityBitmap {
    cells: Vec<Cell>,
    hours_per_day: usize,
}

impl AvailabilityBitmap {
    /// Creates an all-available bitmap sized for the given hour range.
    pub fn new(hours_per_day: usize) -> AvailabilityBitmap {
        AvailabilityBitmap {
            cells: vec![Cell::Available; DAYS_PER_WEEK * hours_per_day * 2],
            hours_per_day,
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn hours_per_day(&self) -> usize {
        self.hours_per_day
    }

    /// Returns the cell at `index`, or None when out of range.
    pub fn get(&self, index: usize) -> Option<Cell> {
        self.cells.get(index).copied()
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Returns a copy with the cell at `index` set to `forced`, or flipped
    /// when `forced` is None. An out-of-range index is silently ignored
    /// and the bitmap comes back unchanged.
    pub fn toggle(&self, index: usize, forced: Option<Cell>) -> AvailabilityBitmap {
        let mut next = self.clone();
        if let Some(cell) = next.cells.get_mut(index) {
            *cell = forced.unwrap_or_else(|| cell.flipped());
        }
        next
    }

    /// Serializes to the wire format: '1' for available, '0' for unavailable.
    pub fn to_wire(&self) -> String {
        self.cells.iter().map(|c| c.to_wire()).collect()
    }

    /// Parses a wire string back into a bitmap for the given hour range.
    /// Rejects wrong lengths and any character other than '0'/'1'.
    pub fn from_wire(bits: &str, hours_per_day: usize) -> Result<AvailabilityBitmap, String> {
        let expected = DAYS_PER_WEEK * hours_per_day * 2;
        if bits.chars().count() != expected {
            return Err(format!(
                "availability string must be {} characters, got {}",
                expected,
                bits.chars().count()
            ));
        }
        let cells = bits
            .chars()
            .map(|c| Cell::from_wire(c).ok_or_else(|| format!("invalid availability character: {:?}", c)))
            .collect::<Result<Vec<Cell>, String>>()?;
        Ok(AvailabilityBitmap { cells, hours_per_day })
    }
}
