use learn_ngin::{
    data_structures::scene::Viewport,
    flow::{FrameLoop, LoopEvent, LoopState},
};
use winit::{dpi::PhysicalSize, event::WindowEvent};

#[test]
fn loop_starts_running() {
    let frame_loop = FrameLoop::new(800, 600);
    assert_eq!(frame_loop.state(), LoopState::Running);
    assert!(frame_loop.is_running());
    assert_eq!(frame_loop.viewport(), Viewport::new(800, 600));
}

#[test]
fn resize_updates_viewport_and_keeps_running() {
    let mut frame_loop = FrameLoop::new(800, 600);
    let applied = frame_loop.handle(LoopEvent::Resized {
        width: 1024,
        height: 333,
    });

    let expected = Viewport {
        left: 0,
        bottom: 0,
        width: 1024,
        height: 333,
    };
    assert_eq!(applied, Some(expected));
    assert_eq!(frame_loop.viewport(), expected);
    assert_eq!(frame_loop.state(), LoopState::Running);
}

#[test]
fn repeated_resizes_keep_the_last_size() {
    let mut frame_loop = FrameLoop::new(800, 600);
    for (w, h) in [(640, 480), (1, 1), (1920, 1080)] {
        frame_loop.handle(LoopEvent::Resized {
            width: w,
            height: h,
        });
    }
    assert_eq!(frame_loop.viewport(), Viewport::new(1920, 1080));
    assert!(frame_loop.is_running());
}

#[test]
fn quit_terminates() {
    let mut frame_loop = FrameLoop::new(800, 600);
    assert_eq!(frame_loop.handle(LoopEvent::Quit), None);
    assert_eq!(frame_loop.state(), LoopState::Terminated);
}

#[test]
fn quit_terminates_after_any_history() {
    let mut frame_loop = FrameLoop::new(800, 600);
    frame_loop.handle(LoopEvent::Other);
    frame_loop.handle(LoopEvent::Resized {
        width: 10,
        height: 10,
    });
    frame_loop.handle(LoopEvent::Other);
    frame_loop.handle(LoopEvent::Quit);
    assert_eq!(frame_loop.state(), LoopState::Terminated);
}

#[test]
fn events_after_termination_are_ignored() {
    let mut frame_loop = FrameLoop::new(800, 600);
    frame_loop.handle(LoopEvent::Quit);

    let applied = frame_loop.handle(LoopEvent::Resized {
        width: 10,
        height: 20,
    });
    assert_eq!(applied, None);
    assert_eq!(frame_loop.viewport(), Viewport::new(800, 600));
    frame_loop.handle(LoopEvent::Quit);
    assert_eq!(frame_loop.state(), LoopState::Terminated);
}

#[test]
fn other_events_change_nothing() {
    let mut frame_loop = FrameLoop::new(320, 240);
    assert_eq!(frame_loop.handle(LoopEvent::Other), None);
    assert_eq!(frame_loop, FrameLoop::new(320, 240));
}

#[test]
fn window_events_map_to_loop_events() {
    assert_eq!(
        LoopEvent::from_window_event(&WindowEvent::CloseRequested),
        LoopEvent::Quit
    );
    assert_eq!(
        LoopEvent::from_window_event(&WindowEvent::Resized(PhysicalSize::new(300, 200))),
        LoopEvent::Resized {
            width: 300,
            height: 200
        }
    );
    assert_eq!(
        LoopEvent::from_window_event(&WindowEvent::Focused(true)),
        LoopEvent::Other
    );
}
