#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Quit,
    Pan(Direction),
    ZoomIn,
    ZoomOut,
    ResetView,
    DragStart(u16, u16),
    DragTo(u16, u16),
    DragEnd,
    Refresh,
    ToggleUsagePanel,
    ToggleHelp,
    None,
}
