use super::*;
use std::sync::mpsc;
use std::time::Duration;

fn make_track() -> TrackDescriptor {
    TrackDescriptor {
        title: "Test Title".to_string(),
        artist: "Test Artist".to_string(),
        album: Some("Test Album".to_string()),
        duration_hint: Some(Duration::from_micros(1_234_567)),
        art: Some("https://example.org/cover.jpg".to_string()),
        source: "/tmp/music/test.mp3".to_string(),
        display: "Test Artist - Test Title".to_string(),
    }
}

fn handle_and_iface() -> (MprisHandle, PlayerIface, mpsc::Receiver<ControlCmd>) {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (tx, rx) = mpsc::channel::<ControlCmd>();
    let handle = MprisHandle {
        state: state.clone(),
    };
    (handle, PlayerIface { tx, state }, rx)
}

#[test]
fn set_track_metadata_sets_and_clears_shared_state() {
    let (handle, iface, _rx) = handle_and_iface();

    let track = make_track();
    handle.set_track_metadata(Some((7, &track)), None);

    {
        let s = iface.state.lock().unwrap();
        assert_eq!(s.title.as_deref(), Some("Test Title"));
        assert_eq!(s.artist, vec!["Test Artist".to_string()]);
        assert_eq!(s.album.as_deref(), Some("Test Album"));
        assert_eq!(s.url.as_deref(), Some("file:///tmp/music/test.mp3"));
        assert_eq!(s.art_url.as_deref(), Some("https://example.org/cover.jpg"));
        assert_eq!(s.length_micros, Some(1_234_567));
        assert_eq!(
            s.track_id.as_ref().map(|p| p.as_str()),
            Some("/org/mpris/MediaPlayer2/track/7")
        );
    }

    handle.set_track_metadata(None, None);
    {
        let s = iface.state.lock().unwrap();
        assert_eq!(s.title, None);
        assert!(s.artist.is_empty());
        assert_eq!(s.album, None);
        assert_eq!(s.url, None);
        assert_eq!(s.art_url, None);
        assert_eq!(s.length_micros, None);
        assert!(s.track_id.is_none());
    }
}

#[test]
fn reported_duration_wins_over_hint() {
    let (handle, iface, _rx) = handle_and_iface();
    let track = make_track();

    handle.set_track_metadata(Some((0, &track)), Some(2.5));
    assert_eq!(iface.state.lock().unwrap().length_micros, Some(2_500_000));

    let unknown = TrackDescriptor {
        duration_hint: None,
        ..make_track()
    };
    handle.set_track_metadata(Some((0, &unknown)), None);
    assert_eq!(iface.state.lock().unwrap().length_micros, None);
}

#[test]
fn blank_artist_is_left_out() {
    let (handle, iface, _rx) = handle_and_iface();
    let track = TrackDescriptor {
        artist: "  ".to_string(),
        ..make_track()
    };
    handle.set_track_metadata(Some((0, &track)), None);

    assert!(iface.state.lock().unwrap().artist.is_empty());
    assert!(!iface.metadata().contains_key("xesam:artist"));
}

#[test]
fn transport_maps_to_status_strings() {
    let (handle, iface, _rx) = handle_and_iface();

    let mut transport = TransportState::default();
    handle.set_transport(&transport);
    assert_eq!(iface.playback_status(), "Paused");
    assert_eq!(iface.loop_status(), "None");
    assert!(!iface.shuffle());
    assert_eq!(iface.volume(), 1.0);

    transport.is_playing = true;
    transport.shuffled = true;
    transport.volume = 0.5;
    transport.repeat_mode = RepeatMode::All;
    handle.set_transport(&transport);
    assert_eq!(iface.playback_status(), "Playing");
    assert_eq!(iface.loop_status(), "Playlist");
    assert!(iface.shuffle());
    assert_eq!(iface.volume(), 0.5);

    transport.repeat_mode = RepeatMode::One;
    handle.set_transport(&transport);
    assert_eq!(iface.loop_status(), "Track");
}

#[test]
fn metadata_includes_expected_keys_when_present() {
    let (handle, iface, _rx) = handle_and_iface();
    handle.set_track_metadata(Some((1, &make_track())), None);

    let map = iface.metadata();
    for k in [
        "mpris:trackid",
        "xesam:title",
        "xesam:artist",
        "xesam:album",
        "xesam:url",
        "mpris:artUrl",
        "mpris:length",
    ] {
        assert!(map.contains_key(k), "missing key: {k}");
    }
}

#[test]
fn metadata_is_empty_without_a_track() {
    let (_handle, iface, _rx) = handle_and_iface();
    assert!(iface.metadata().is_empty());
}

#[test]
fn player_methods_forward_control_commands() {
    let (_handle, iface, rx) = handle_and_iface();

    iface.play();
    iface.pause();
    iface.play_pause();
    iface.stop();
    iface.next();
    iface.previous();

    let got: Vec<ControlCmd> = rx.try_iter().collect();
    assert_eq!(
        got,
        vec![
            ControlCmd::Play,
            ControlCmd::Pause,
            ControlCmd::PlayPause,
            ControlCmd::Stop,
            ControlCmd::Next,
            ControlCmd::Prev,
        ]
    );
}

#[test]
fn root_quit_forwards_quit() {
    let (tx, rx) = mpsc::channel::<ControlCmd>();
    let root = RootIface { tx };
    root.quit();
    assert_eq!(rx.try_recv(), Ok(ControlCmd::Quit));
}

#[test]
fn source_url_keeps_existing_schemes() {
    assert_eq!(source_url("/a/b.mp3"), "file:///a/b.mp3");
    assert_eq!(source_url("https://x/y.mp3"), "https://x/y.mp3");
}
