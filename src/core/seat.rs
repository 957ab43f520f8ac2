//! Seat identification and per-seat data storage.
//!
//! ## Seat
//!
//! A match always has exactly two seats. `Seat` is a closed enum rather
//! than a numeric id so "the other player" is a total function.
//!
//! ## SeatMap
//!
//! Per-seat data storage backed by a fixed two-element array with O(1)
//! access. Supports iteration and indexing by `Seat`.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// One of the two player seats in a match.
///
/// Seat one always exists and always starts odd-numbered rounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Seat {
    One,
    Two,
}

impl Seat {
    /// Both seats, in seating order.
    pub const ALL: [Seat; 2] = [Seat::One, Seat::Two];

    /// The opposing seat.
    #[must_use]
    pub const fn opponent(self) -> Seat {
        match self {
            Seat::One => Seat::Two,
            Seat::Two => Seat::One,
        }
    }

    /// Get the 0-based index for array storage.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Seat::One => 0,
            Seat::Two => 1,
        }
    }

    /// The seat that starts a given round: odd rounds belong to seat one,
    /// even rounds to seat two.
    #[must_use]
    pub const fn starter_for_round(round: u32) -> Seat {
        if round % 2 == 1 {
            Seat::One
        } else {
            Seat::Two
        }
    }
}

impl std::fmt::Display for Seat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Seat::One => write!(f, "Player 1"),
            Seat::Two => write!(f, "Player 2"),
        }
    }
}

/// Per-seat data storage with O(1) access.
///
/// Backed by a fixed `[T; 2]` with one entry per seat.
///
/// ## Example
///
/// ```
/// use realpolitik::core::{Seat, SeatMap};
///
/// let mut ap: SeatMap<i32> = SeatMap::with_value(2);
///
/// assert_eq!(ap[Seat::One], 2);
///
/// ap[Seat::Two] = 4;
/// assert_eq!(ap[Seat::Two], 4);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeatMap<T> {
    data: [T; 2],
}

impl<T> SeatMap<T> {
    /// Create a new SeatMap with values from a factory function.
    pub fn new(factory: impl Fn(Seat) -> T) -> Self {
        Self {
            data: [factory(Seat::One), factory(Seat::Two)],
        }
    }

    /// Create a new SeatMap with both entries set to the same value.
    pub fn with_value(value: T) -> Self
    where
        T: Clone,
    {
        Self::new(|_| value.clone())
    }

    /// Create a new SeatMap with default values.
    pub fn with_default() -> Self
    where
        T: Default,
    {
        Self::new(|_| T::default())
    }

    /// Get a reference to a seat's data.
    #[must_use]
    pub fn get(&self, seat: Seat) -> &T {
        &self.data[seat.index()]
    }

    /// Get a mutable reference to a seat's data.
    pub fn get_mut(&mut self, seat: Seat) -> &mut T {
        &mut self.data[seat.index()]
    }

    /// Iterate over (Seat, &T) pairs in seating order.
    pub fn iter(&self) -> impl Iterator<Item = (Seat, &T)> {
        Seat::ALL.into_iter().map(move |s| (s, &self.data[s.index()]))
    }
}

impl<T: Default> Default for SeatMap<T> {
    fn default() -> Self {
        Self::with_default()
    }
}

impl<T> Index<Seat> for SeatMap<T> {
    type Output = T;

    fn index(&self, seat: Seat) -> &Self::Output {
        self.get(seat)
    }
}

impl<T> IndexMut<Seat> for SeatMap<T> {
    fn index_mut(&mut self, seat: Seat) -> &mut Self::Output {
        self.get_mut(seat)
    }
}
