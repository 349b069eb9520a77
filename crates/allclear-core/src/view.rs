//! Drawer layout state machine.
//!
//! The facility list lives in a side drawer on wide windows and in a bottom
//! sheet on narrow ones. On narrow windows the sheet is either collapsed
//! (map mostly visible) or expanded (list mostly visible).

/// Windows narrower than this use the bottom-sheet layout.
pub const MOBILE_BREAKPOINT_PX: u32 = 960;

const COLLAPSED_HEIGHT_PERCENT: u8 = 40;
const EXPANDED_HEIGHT_PERCENT: u8 = 85;
const DESKTOP_DRAWER_WIDTH_PX: u32 = 400;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawerMode {
    DesktopOpen,
    MobileCollapsed,
    MobileExpanded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Left,
    Bottom,
}

impl Anchor {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Anchor::Left => "left",
            Anchor::Bottom => "bottom",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawerHeight {
    /// Percentage of the window height.
    Percent(u8),
    /// Full height with a fixed pixel width.
    FullWithWidth(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewState {
    mode: DrawerMode,
    window_width: u32,
    window_height: u32,
}

impl ViewState {
    /// Initial layout for a window of the given size. Narrow windows start
    /// collapsed.
    #[must_use]
    pub fn new(window_width: u32, window_height: u32) -> Self {
        Self {
            mode: mode_for_width(window_width),
            window_width,
            window_height,
        }
    }

    #[must_use]
    pub fn mode(&self) -> DrawerMode {
        self.mode
    }

    #[must_use]
    pub fn window_size(&self) -> (u32, u32) {
        (self.window_width, self.window_height)
    }

    #[must_use]
    pub fn is_mobile(&self) -> bool {
        self.mode != DrawerMode::DesktopOpen
    }

    #[must_use]
    pub fn anchor(&self) -> Anchor {
        if self.is_mobile() {
            Anchor::Bottom
        } else {
            Anchor::Left
        }
    }

    /// The desktop drawer is always open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.mode != DrawerMode::MobileCollapsed
    }

    #[must_use]
    pub fn drawer_height(&self) -> DrawerHeight {
        match self.mode {
            DrawerMode::DesktopOpen => DrawerHeight::FullWithWidth(DESKTOP_DRAWER_WIDTH_PX),
            DrawerMode::MobileCollapsed => DrawerHeight::Percent(COLLAPSED_HEIGHT_PERCENT),
            DrawerMode::MobileExpanded => DrawerHeight::Percent(EXPANDED_HEIGHT_PERCENT),
        }
    }

    /// Label of the mobile list/map toggle button, or `None` on desktop.
    #[must_use]
    pub fn toggle_label(&self) -> Option<&'static str> {
        match self.mode {
            DrawerMode::DesktopOpen => None,
            DrawerMode::MobileCollapsed => Some("List"),
            DrawerMode::MobileExpanded => Some("Map"),
        }
    }

    #[must_use]
    pub fn edit_filters_label(&self) -> &'static str {
        match self.anchor() {
            Anchor::Bottom => "Edit Filters",
            Anchor::Left => "Edit Search Filters",
        }
    }

    /// Records a new window size. Crossing the breakpoint switches layout;
    /// entering the mobile layout always lands collapsed. Resizes that stay
    /// on one side of the breakpoint keep the current mode.
    ///
    /// Returns `true` if the mode changed.
    pub fn resize(&mut self, window_width: u32, window_height: u32) -> bool {
        self.window_width = window_width;
        self.window_height = window_height;
        let target = mode_for_width(window_width);
        let crossed = (target == DrawerMode::DesktopOpen) != (self.mode == DrawerMode::DesktopOpen);
        if crossed {
            self.mode = target;
        }
        crossed
    }

    /// Flips collapsed/expanded. No-op on desktop.
    pub fn toggle(&mut self) -> bool {
        self.mode = match self.mode {
            DrawerMode::DesktopOpen => return false,
            DrawerMode::MobileCollapsed => DrawerMode::MobileExpanded,
            DrawerMode::MobileExpanded => DrawerMode::MobileCollapsed,
        };
        true
    }

    /// Tapping the map dismisses an expanded sheet. No-op otherwise.
    pub fn map_tapped(&mut self) -> bool {
        if self.mode == DrawerMode::MobileExpanded {
            self.mode = DrawerMode::MobileCollapsed;
            true
        } else {
            false
        }
    }
}

fn mode_for_width(width: u32) -> DrawerMode {
    if width < MOBILE_BREAKPOINT_PX {
        DrawerMode::MobileCollapsed
    } else {
        DrawerMode::DesktopOpen
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shrinking_past_breakpoint_lands_collapsed() {
        let mut view = ViewState::new(1200, 800);
        assert_eq!(view.mode(), DrawerMode::DesktopOpen);

        assert!(view.resize(800, 800));
        assert_eq!(view.mode(), DrawerMode::MobileCollapsed);
        assert_eq!(view.anchor(), Anchor::Bottom);
        assert!(!view.is_open());
    }

    #[test]
    fn resize_within_mobile_keeps_expanded() {
        let mut view = ViewState::new(700, 900);
        view.toggle();
        assert!(!view.resize(720, 900));
        assert_eq!(view.mode(), DrawerMode::MobileExpanded);
        assert_eq!(view.window_size(), (720, 900));
    }

    #[test]
    fn growing_past_breakpoint_opens_desktop_drawer() {
        let mut view = ViewState::new(500, 900);
        view.toggle();
        assert!(view.resize(960, 900));
        assert_eq!(view.mode(), DrawerMode::DesktopOpen);
        assert_eq!(view.drawer_height(), DrawerHeight::FullWithWidth(400));
        assert_eq!(view.toggle_label(), None);
    }

    #[test]
    fn toggle_flips_only_on_mobile() {
        let mut desktop = ViewState::new(1400, 900);
        assert!(!desktop.toggle());
        assert_eq!(desktop.mode(), DrawerMode::DesktopOpen);

        let mut mobile = ViewState::new(400, 800);
        assert_eq!(mobile.toggle_label(), Some("List"));
        assert!(mobile.toggle());
        assert_eq!(mobile.mode(), DrawerMode::MobileExpanded);
        assert_eq!(mobile.drawer_height(), DrawerHeight::Percent(85));
        assert_eq!(mobile.toggle_label(), Some("Map"));
        assert!(mobile.toggle());
        assert_eq!(mobile.drawer_height(), DrawerHeight::Percent(40));
    }

    #[test]
    fn map_tap_dismisses_only_expanded_sheet() {
        let mut view = ViewState::new(400, 800);
        assert!(!view.map_tapped());
        view.toggle();
        assert!(view.map_tapped());
        assert_eq!(view.mode(), DrawerMode::MobileCollapsed);

        let mut desktop = ViewState::new(1200, 800);
        assert!(!desktop.map_tapped());
    }

    #[test]
    fn filter_button_label_follows_anchor() {
        assert_eq!(ViewState::new(400, 800).edit_filters_label(), "Edit Filters");
        assert_eq!(
            ViewState::new(1200, 800).edit_filters_label(),
            "Edit Search Filters"
        );
    }
}
