// Numan Thabit 2025
use netsync_core::{DeltaCompressor, PacketWriter, StreamSource};
use netsync_demo::record::{PlayerCodec, PlayerState, TickCodec, TickContext};
use tokio::net::{TcpListener, TcpStream};

type Roster = DeltaCompressor<PlayerState, TickContext, PlayerCodec, TickCodec>;

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn roster_converges_over_a_real_tcp_connection() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let initial = vec![PlayerState::default(); 3];
        let mut sender = Roster::new(initial).unwrap();
        let mut writer = PacketWriter::new(stream);

        let steps = [
            (
                vec![
                    PlayerState { x: 1.0, y: 0.0, health: 100, last_synced_tick: 0 },
                    PlayerState::default(),
                    PlayerState::default(),
                ],
                TickContext { tick: 1 },
            ),
            (
                vec![
                    PlayerState { x: 1.0, y: 0.0, health: 100, last_synced_tick: 0 },
                    PlayerState { x: 0.0, y: 2.0, health: 50, last_synced_tick: 0 },
                    PlayerState::default(),
                ],
                TickContext { tick: 2 },
            ),
        ];

        for (state, ctx) in steps {
            sender.write_packet(&mut writer, &state, &ctx).await.unwrap();
        }
        // Dropping the stream closes the write half, which the client reads
        // as end-of-stream and uses to stop applying packets.
        drop(writer.into_inner());
    });

    let client_stream = TcpStream::connect(addr).await.unwrap();
    let initial = vec![PlayerState::default(); 3];
    let mut receiver = Roster::new(initial).unwrap();
    let mut source = StreamSource::new(client_stream);
    receiver.apply_packet(&mut source).await.unwrap();

    server.await.unwrap();

    assert_eq!(receiver.current_state()[0].x, 1.0);
    assert_eq!(receiver.current_state()[0].health, 100);
    assert_eq!(receiver.current_state()[1].y, 2.0);
    assert_eq!(receiver.current_state()[1].health, 50);
    for player in receiver.current_state() {
        assert_eq!(player.last_synced_tick, 2);
    }
}
