//! Latched input state shared between the producer and the frame clock.
//!
//! Everything here is a plain atomic scalar. Reads see the latest completed
//! write; nothing needs cross-field atomicity, so there are no locks.

use crate::keycode::{
    GLFW_KEY_CAPS_LOCK, GLFW_KEY_LEFT_ALT, GLFW_KEY_LEFT_CONTROL, GLFW_KEY_LEFT_SHIFT,
    GLFW_KEY_NUM_LOCK, GLFW_MOD_ALT, GLFW_MOD_CAPS_LOCK, GLFW_MOD_CONTROL, GLFW_MOD_NUM_LOCK,
    GLFW_MOD_SHIFT,
};
use std::sync::atomic::{AtomicBool, AtomicI32, AtomicU32, Ordering};

/// The five modifier latches the bridge tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modifier {
    Alt,
    CapsLock,
    Control,
    NumLock,
    Shift,
}

impl Modifier {
    /// All tracked modifiers.
    pub const ALL: [Modifier; 5] = [
        Modifier::Alt,
        Modifier::CapsLock,
        Modifier::Control,
        Modifier::NumLock,
        Modifier::Shift,
    ];

    /// Map a GLFW key code to the latch it drives, if any.
    pub fn from_key(key: i32) -> Option<Self> {
        match key {
            GLFW_KEY_LEFT_SHIFT => Some(Modifier::Shift),
            GLFW_KEY_LEFT_CONTROL => Some(Modifier::Control),
            GLFW_KEY_LEFT_ALT => Some(Modifier::Alt),
            GLFW_KEY_CAPS_LOCK => Some(Modifier::CapsLock),
            GLFW_KEY_NUM_LOCK => Some(Modifier::NumLock),
            _ => None,
        }
    }

    /// The GLFW modifier flag for this latch.
    pub fn flag(self) -> i32 {
        match self {
            Modifier::Alt => GLFW_MOD_ALT,
            Modifier::CapsLock => GLFW_MOD_CAPS_LOCK,
            Modifier::Control => GLFW_MOD_CONTROL,
            Modifier::NumLock => GLFW_MOD_NUM_LOCK,
            Modifier::Shift => GLFW_MOD_SHIFT,
        }
    }
}

/// Modifier key latches.
///
/// Each latch holds the most recent down/up report for its key. The mask is
/// derived on every call so it can never go stale.
#[derive(Debug, Default)]
pub struct ModifierState {
    alt: AtomicBool,
    caps_lock: AtomicBool,
    control: AtomicBool,
    num_lock: AtomicBool,
    shift: AtomicBool,
}

impl ModifierState {
    /// Create a tracker with every latch released.
    pub const fn new() -> Self {
        Self {
            alt: AtomicBool::new(false),
            caps_lock: AtomicBool::new(false),
            control: AtomicBool::new(false),
            num_lock: AtomicBool::new(false),
            shift: AtomicBool::new(false),
        }
    }

    fn latch(&self, modifier: Modifier) -> &AtomicBool {
        match modifier {
            Modifier::Alt => &self.alt,
            Modifier::CapsLock => &self.caps_lock,
            Modifier::Control => &self.control,
            Modifier::NumLock => &self.num_lock,
            Modifier::Shift => &self.shift,
        }
    }

    /// Set one latch directly.
    #[inline]
    pub fn set(&self, modifier: Modifier, is_down: bool) {
        self.latch(modifier).store(is_down, Ordering::SeqCst);
    }

    /// Update the latch for `key`.
    ///
    /// Returns `false` without touching anything when `key` is not one of the
    /// tracked modifier keys.
    pub fn set_from_key(&self, key: i32, is_down: bool) -> bool {
        match Modifier::from_key(key) {
            Some(modifier) => {
                self.set(modifier, is_down);
                true
            }
            None => false,
        }
    }

    /// Check if a latch is currently down.
    #[inline]
    pub fn is_held(&self, modifier: Modifier) -> bool {
        self.latch(modifier).load(Ordering::SeqCst)
    }

    /// OR of the GLFW flags of every latch that is down.
    pub fn mask(&self) -> i32 {
        Modifier::ALL
            .iter()
            .filter(|m| self.is_held(**m))
            .fold(0, |mask, m| mask | m.flag())
    }

    /// Release every latch.
    pub fn reset(&self) {
        for modifier in Modifier::ALL {
            self.set(modifier, false);
        }
    }
}

/// Last known absolute pointer position.
///
/// Coordinates are stored as `f32` bit patterns.
#[derive(Debug)]
pub struct CursorPosition {
    x: AtomicU32,
    y: AtomicU32,
}

impl Default for CursorPosition {
    fn default() -> Self {
        Self::new()
    }
}

impl CursorPosition {
    pub const fn new() -> Self {
        // 0.0f32 is all zero bits
        Self {
            x: AtomicU32::new(0),
            y: AtomicU32::new(0),
        }
    }

    #[inline]
    pub fn set(&self, x: f32, y: f32) {
        self.x.store(x.to_bits(), Ordering::SeqCst);
        self.y.store(y.to_bits(), Ordering::SeqCst);
    }

    #[inline]
    pub fn get(&self) -> (f32, f32) {
        (
            f32::from_bits(self.x.load(Ordering::SeqCst)),
            f32::from_bits(self.y.load(Ordering::SeqCst)),
        )
    }

    /// Move by a relative delta and return the new position.
    pub fn offset(&self, dx: f32, dy: f32) -> (f32, f32) {
        let (x, y) = self.get();
        let moved = (x + dx, y + dy);
        self.set(moved.0, moved.1);
        moved
    }
}

/// Logical and physical window dimensions.
#[derive(Debug, Default)]
pub struct WindowSize {
    width: AtomicI32,
    height: AtomicI32,
    physical_width: AtomicI32,
    physical_height: AtomicI32,
}

impl WindowSize {
    pub const fn new() -> Self {
        Self {
            width: AtomicI32::new(0),
            height: AtomicI32::new(0),
            physical_width: AtomicI32::new(0),
            physical_height: AtomicI32::new(0),
        }
    }

    pub fn set(&self, width: i32, height: i32) {
        self.width.store(width, Ordering::SeqCst);
        self.height.store(height, Ordering::SeqCst);
    }

    pub fn get(&self) -> (i32, i32) {
        (
            self.width.load(Ordering::SeqCst),
            self.height.load(Ordering::SeqCst),
        )
    }

    pub fn set_physical(&self, width: i32, height: i32) {
        self.physical_width.store(width, Ordering::SeqCst);
        self.physical_height.store(height, Ordering::SeqCst);
    }

    pub fn physical(&self) -> (i32, i32) {
        (
            self.physical_width.load(Ordering::SeqCst),
            self.physical_height.load(Ordering::SeqCst),
        )
    }
}

/// All latched state of one bridge.
#[derive(Debug, Default)]
pub struct BridgeState {
    pub modifiers: ModifierState,
    pub cursor: CursorPosition,
    pub window: WindowSize,
}

impl BridgeState {
    pub const fn new() -> Self {
        Self {
            modifiers: ModifierState::new(),
            cursor: CursorPosition::new(),
            window: WindowSize::new(),
        }
    }
}
