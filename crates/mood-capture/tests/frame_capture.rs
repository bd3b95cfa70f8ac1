//! Frame extraction from ready and unready sessions.

use std::time::Duration;

use image::RgbaImage;
use mood_capture::{
    CaptureError, DeviceSessionManager, FrameSize, StillImageCamera, StreamRequest,
    TestPatternCamera, capture_frame,
};
use pretty_assertions::assert_eq;

#[tokio::test]
async fn frame_matches_natural_dimensions() {
    for size in [
        FrameSize::new(640, 480),
        FrameSize::new(1280, 720),
        FrameSize::new(1, 1),
        FrameSize::new(3, 97),
    ] {
        let camera = TestPatternCamera::new().with_natural_size(size);
        let mut devices = DeviceSessionManager::new(camera, StreamRequest::default());
        devices.start().await.expect("device opens");
        devices.mark_ready().expect("ready");

        let frame = capture_frame(devices.session_mut().expect("session"))
            .await
            .expect("frame captured");
        assert_eq!(frame.size(), size);

        let decoded = image::load_from_memory(frame.png()).expect("valid png");
        assert_eq!((decoded.width(), decoded.height()), (size.width, size.height));
    }
}

#[tokio::test]
async fn unready_session_never_yields_a_frame() {
    let camera = TestPatternCamera::new().with_warmup(Duration::from_secs(60));
    let mut devices = DeviceSessionManager::new(camera, StreamRequest::default());
    devices.start().await.expect("device opens");

    assert!(devices.mark_ready().is_err());
    let err = capture_frame(devices.session_mut().expect("session"))
        .await
        .unwrap_err();
    assert!(matches!(err, CaptureError::StreamNotReady(_)));
}

#[tokio::test]
async fn still_image_round_trips_pixels() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("face.png");
    let mut source = RgbaImage::new(8, 6);
    source.put_pixel(2, 3, image::Rgba([10, 20, 30, 255]));
    source.save(&path).expect("fixture saved");

    let mut devices =
        DeviceSessionManager::new(StillImageCamera::new(&path), StreamRequest::default());
    devices.start().await.expect("device opens");
    devices.mark_ready().expect("ready");

    let frame = capture_frame(devices.session_mut().expect("session"))
        .await
        .expect("frame captured");
    let decoded = image::load_from_memory(frame.png()).expect("valid png").to_rgba8();
    assert_eq!(decoded.get_pixel(2, 3), &image::Rgba([10, 20, 30, 255]));
}
