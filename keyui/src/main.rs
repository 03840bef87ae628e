use std::io::Write;
use std::os::unix::io::AsRawFd;

use crossterm::terminal;
use keyui::config;
use keyui::mapset::MapSet;
use keyui::KeyManager;

/// Demo front-end: puts the terminal in raw mode, resolves keys through a
/// `KeyManager`, and prints what each one decoded to. Pass a map-directive
/// file as the first argument to install a user map-set on top of the
/// built-in terminal escape table. Press `Ctrl-C` to exit.
#[tokio::main(flavor = "current_thread")]
async fn main() {
    let stdin = std::io::stdin();
    let fd = stdin.as_raw_fd();

    if let Err(e) = terminal::enable_raw_mode() {
        eprintln!("keyui-echo: failed to enable raw mode: {e}");
        std::process::exit(1);
    }

    let result = run(fd).await;

    if let Err(e) = terminal::disable_raw_mode() {
        eprintln!("keyui-echo: failed to restore terminal mode: {e}");
    }

    if let Err(e) = result {
        eprintln!("keyui-echo: {e}");
        std::process::exit(1);
    }
}

async fn run(fd: i32) -> std::io::Result<()> {
    let (mut manager, warnings) = KeyManager::from_env(fd, 40, 1000)?;
    for w in &warnings {
        eprintln!("keyui-echo: warning: {w}");
    }

    if let Some(path) = std::env::args().nth(1) {
        let text = std::fs::read_to_string(&path)?;
        let (directives, parse_warnings) = config::parse_map_directives(&text);
        for w in &parse_warnings {
            eprintln!("keyui-echo: {path}: {w}");
        }
        let mut user_map_set = MapSet::new();
        for (key, value) in directives {
            if let Err(e) = user_map_set.register(&key, &value) {
                eprintln!("keyui-echo: {path}: {e}");
            }
        }
        manager.set_user_map_set(user_map_set);
    }

    println!("keyui-echo: reading keys, Ctrl-C to quit\r");
    loop {
        match manager.get_key().await? {
            Some(key) => {
                // Ctrl-C arrives as the raw byte 0x03: the terminal map-set
                // has no capability-derived translation for Ctrl chords, so
                // it passes through both layers unmapped unless a user
                // macro binds it to something else.
                if key == keyui::LogicalKey::Byte(0x03) {
                    break;
                }
                print!("{key}\r\n");
                std::io::stdout().flush()?;
            }
            None => continue,
        }
    }
    Ok(())
}
