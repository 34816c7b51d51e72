// Numan Thabit 2025
//! Concrete [`RecordCodec`]/[`ContextCodec`] pair used by the demo binary:
//! a fixed roster of player positions, synchronized tick by tick.

use netsync_core::{ByteCursor, ContextCodec, FrameBuffer, RecordCodec};

const MASK_X: u64 = 1 << 0;
const MASK_Y: u64 = 1 << 1;
const MASK_HEALTH: u64 = 1 << 2;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlayerState {
    pub x: f32,
    pub y: f32,
    pub health: u16,
    /// Tick at which this slot was last touched by `apply_context`; not
    /// part of the wire payload.
    pub last_synced_tick: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickContext {
    pub tick: u64,
}

pub struct PlayerCodec;

impl RecordCodec<PlayerState, TickContext> for PlayerCodec {
    fn change_mask(new: &PlayerState, old: &PlayerState, _ctx: &TickContext) -> u64 {
        let mut mask = 0u64;
        if new.x != old.x {
            mask |= MASK_X;
        }
        if new.y != old.y {
            mask |= MASK_Y;
        }
        if new.health != old.health {
            mask |= MASK_HEALTH;
        }
        mask
    }

    fn delta_size(mask: u64) -> usize {
        let mut size = 0;
        if mask & MASK_X != 0 {
            size += 4;
        }
        if mask & MASK_Y != 0 {
            size += 4;
        }
        if mask & MASK_HEALTH != 0 {
            size += 2;
        }
        size
    }

    fn write_delta(record: &PlayerState, buf: &mut FrameBuffer, mask: u64) {
        if mask & MASK_X != 0 {
            buf.write_f32(record.x);
        }
        if mask & MASK_Y != 0 {
            buf.write_f32(record.y);
        }
        if mask & MASK_HEALTH != 0 {
            buf.write_u16(record.health);
        }
    }

    fn apply_delta(record: &mut PlayerState, cursor: &mut ByteCursor, mask: u64) {
        if mask & MASK_X != 0 {
            record.x = cursor.read_f32();
        }
        if mask & MASK_Y != 0 {
            record.y = cursor.read_f32();
        }
        if mask & MASK_HEALTH != 0 {
            record.health = cursor.read_u16();
        }
    }

    fn apply_context(record: &mut PlayerState, ctx: &TickContext) {
        record.last_synced_tick = ctx.tick;
    }
}

pub struct TickCodec;

impl ContextCodec<TickContext> for TickCodec {
    const CONTEXT_SIZE: usize = 8;

    fn write(ctx: &TickContext, buf: &mut FrameBuffer) {
        buf.write_u64(ctx.tick);
    }

    fn read(cursor: &mut ByteCursor) -> TickContext {
        TickContext {
            tick: cursor.read_u64(),
        }
    }
}

pub type Roster = netsync_core::DeltaCompressor<PlayerState, TickContext, PlayerCodec, TickCodec>;
