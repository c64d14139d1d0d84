/// Which pointer button was pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Other,
}

/// Raw pointer input, already translated out of the windowing layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// Relative motion in device units.
    Moved { dx: f32, dy: f32 },
    /// A button went down.
    Pressed(PointerButton),
    /// The platform reports the pointer is now captured.
    Locked,
    /// The platform reports the pointer was released (focus lost, escape, ...).
    Unlocked,
}

/// What the windowing layer should do with pointer capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockRequest {
    Acquire,
    Release,
}

/// Result of feeding one event through the gate.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerResponse {
    /// Motion to apply to the camera, only while locked.
    pub delta: Option<(f32, f32)>,
    /// Capture change to ask the platform for.
    pub request: Option<LockRequest>,
}

/// Tracks pointer-lock state and turns events into camera deltas.
///
/// The gate never grabs the pointer itself. A primary press while unlocked
/// asks for capture, any other press asks to release it, and the platform
/// confirms with [`PointerEvent::Locked`] / [`PointerEvent::Unlocked`].
#[derive(Debug, Default)]
pub struct PointerGate {
    locked: bool,
}

impl PointerGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn handle(&mut self, event: PointerEvent) -> PointerResponse {
        match event {
            PointerEvent::Moved { dx, dy } if self.locked => PointerResponse {
                delta: Some((dx, dy)),
                request: None,
            },
            PointerEvent::Moved { .. } => PointerResponse::default(),
            PointerEvent::Pressed(PointerButton::Primary) if !self.locked => PointerResponse {
                delta: None,
                request: Some(LockRequest::Acquire),
            },
            PointerEvent::Pressed(PointerButton::Primary) => PointerResponse::default(),
            PointerEvent::Pressed(_) => PointerResponse {
                delta: None,
                request: Some(LockRequest::Release),
            },
            PointerEvent::Locked => {
                if !self.locked {
                    tracing::debug!("pointer locked");
                }
                self.locked = true;
                PointerResponse::default()
            }
            PointerEvent::Unlocked => {
                if self.locked {
                    tracing::debug!("pointer unlocked");
                }
                self.locked = false;
                PointerResponse::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn motion_ignored_while_unlocked() {
        let mut gate = PointerGate::new();
        let r = gate.handle(PointerEvent::Moved { dx: 3.0, dy: 4.0 });
        assert_eq!(r.delta, None);
    }

    #[test]
    fn motion_forwarded_while_locked() {
        let mut gate = PointerGate::new();
        gate.handle(PointerEvent::Locked);
        let r = gate.handle(PointerEvent::Moved { dx: 3.0, dy: -4.0 });
        assert_eq!(r.delta, Some((3.0, -4.0)));
    }

    #[test]
    fn primary_press_requests_lock_once() {
        let mut gate = PointerGate::new();
        let r = gate.handle(PointerEvent::Pressed(PointerButton::Primary));
        assert_eq!(r.request, Some(LockRequest::Acquire));
        // Requesting is not the same as being locked.
        assert!(!gate.is_locked());

        gate.handle(PointerEvent::Locked);
        let r = gate.handle(PointerEvent::Pressed(PointerButton::Primary));
        assert_eq!(r.request, None);
    }

    #[test]
    fn other_buttons_release() {
        let mut gate = PointerGate::new();
        gate.handle(PointerEvent::Locked);
        let r = gate.handle(PointerEvent::Pressed(PointerButton::Secondary));
        assert_eq!(r.request, Some(LockRequest::Release));
        gate.handle(PointerEvent::Unlocked);
        assert!(!gate.is_locked());
    }
}
