//! Ordered channel collection with a designated main channel

use log::info;

use crate::{
    channel::{ChannelId, PixelChannel},
    pipeline::TransmitLink,
};

pub(crate) struct ChannelEntry {
    pub(crate) channel: PixelChannel,
    /// `None` while the driver is stopped or the transport could not be reopened
    pub(crate) link: Option<TransmitLink>,
}

#[derive(Default)]
pub(crate) struct ChannelRegistry {
    entries: Vec<ChannelEntry>,
    next_id: ChannelId,
    main: Option<ChannelId>,
}

impl ChannelRegistry {
    /// Hand out the next id; ids of failed additions are not reused
    pub(crate) fn allocate_id(&mut self) -> ChannelId {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    pub(crate) fn insert(&mut self, entry: ChannelEntry) {
        let id = entry.channel.id();
        self.entries.push(entry);
        if self.main.is_none() {
            self.main = Some(id);
            info!("channel {id} is now the main channel");
        }
    }

    /// Remove a channel, promoting another one to main if needed
    pub(crate) fn remove(&mut self, id: ChannelId) -> Option<ChannelEntry> {
        let index = self.entries.iter().position(|e| e.channel.id() == id)?;
        let entry = self.entries.remove(index);
        if self.main == Some(id) {
            self.main = self.entries.first().map(|e| e.channel.id());
            if let Some(main) = self.main {
                info!("channel {main} is now the main channel");
            }
        }
        Some(entry)
    }

    pub(crate) fn main(&self) -> Option<ChannelId> {
        self.main
    }

    pub(crate) fn ids(&self) -> Vec<ChannelId> {
        self.entries.iter().map(|e| e.channel.id()).collect()
    }

    pub(crate) fn get(&self, id: ChannelId) -> Option<&ChannelEntry> {
        self.entries.iter().find(|e| e.channel.id() == id)
    }

    pub(crate) fn get_mut(&mut self, id: ChannelId) -> Option<&mut ChannelEntry> {
        self.entries.iter_mut().find(|e| e.channel.id() == id)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &ChannelEntry> {
        self.entries.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut ChannelEntry> {
        self.entries.iter_mut()
    }

    pub(crate) fn drain(&mut self) -> Vec<ChannelEntry> {
        self.main = None;
        core::mem::take(&mut self.entries)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
