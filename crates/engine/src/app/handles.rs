/// Selection control handles drawn around a selected object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlHandle {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    MiddleLeft,
    MiddleRight,
    MiddleTop,
    MiddleBottom,
    Rotate,
}

const HANDLE_COUNT: usize = 9;

impl ControlHandle {
    pub const ALL: [ControlHandle; HANDLE_COUNT] = [
        ControlHandle::TopLeft,
        ControlHandle::TopRight,
        ControlHandle::BottomLeft,
        ControlHandle::BottomRight,
        ControlHandle::MiddleLeft,
        ControlHandle::MiddleRight,
        ControlHandle::MiddleTop,
        ControlHandle::MiddleBottom,
        ControlHandle::Rotate,
    ];

    const fn index(self) -> usize {
        match self {
            ControlHandle::TopLeft => 0,
            ControlHandle::TopRight => 1,
            ControlHandle::BottomLeft => 2,
            ControlHandle::BottomRight => 3,
            ControlHandle::MiddleLeft => 4,
            ControlHandle::MiddleRight => 5,
            ControlHandle::MiddleTop => 6,
            ControlHandle::MiddleBottom => 7,
            ControlHandle::Rotate => 8,
        }
    }
}

/// New objects show every handle until told otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandleVisibility {
    visible: [bool; HANDLE_COUNT],
}

impl Default for HandleVisibility {
    fn default() -> Self {
        Self {
            visible: [true; HANDLE_COUNT],
        }
    }
}

impl HandleVisibility {
    pub fn set(&mut self, handle: ControlHandle, visible: bool) {
        self.visible[handle.index()] = visible;
    }

    pub fn is_visible(&self, handle: ControlHandle) -> bool {
        self.visible[handle.index()]
    }

    pub fn visible_handles(&self) -> impl Iterator<Item = ControlHandle> + '_ {
        ControlHandle::ALL
            .into_iter()
            .filter(|handle| self.is_visible(*handle))
    }

    pub fn none_visible(&self) -> bool {
        self.visible_handles().next().is_none()
    }
}
