use learn_ngin::{DemoError, InitStage};

#[test]
fn every_failure_exits_with_one() {
    let errors = [
        DemoError::init(InitStage::EventLoop, "no display"),
        DemoError::init(InitStage::Window, "denied"),
        DemoError::init(InitStage::Surface, "unsupported"),
        DemoError::init(InitStage::Adapter, "none found"),
        DemoError::init(InitStage::Device, "lost"),
        DemoError::init(InitStage::SwapChain, "no formats"),
        DemoError::init(InitStage::Material, "bad shader"),
        DemoError::init(InitStage::Renderable, "mismatch"),
        DemoError::asset("rgba8_200x200.rgba", "too short"),
        DemoError::InvalidHandle { kind: "Camera" },
    ];
    for error in errors {
        assert_eq!(error.exit_code(), 1, "{error}");
    }
}

#[test]
fn messages_name_the_failed_stage() {
    assert_eq!(
        DemoError::init(InitStage::Adapter, "no adapter found").to_string(),
        "failed to create adapter: no adapter found"
    );
    assert_eq!(
        DemoError::init(InitStage::SwapChain, "zero sized").to_string(),
        "failed to create swap chain: zero sized"
    );
}

#[test]
fn asset_messages_name_the_path() {
    let error = DemoError::asset("assets/cube.obj", "unexpected end of file");
    assert_eq!(
        error.to_string(),
        "failed to load asset assets/cube.obj: unexpected end of file"
    );
}

#[test]
fn invalid_handles_name_the_kind() {
    let error = DemoError::InvalidHandle { kind: "Renderable" };
    assert_eq!(
        error.to_string(),
        "handle does not refer to a live Renderable"
    );
}
