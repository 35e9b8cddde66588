//! Canonical command taxonomy
//!
//! Every request reaching the gate is reduced to exactly one [`Command`].
//! The string form of each variant is stable: it is what the classifier
//! composes from path segments and what downstream dispatchers match on.
//!
//! Adding an API action means adding one variant here (plus its entry in
//! [`Command::ALL`]) and one routing rule in the classifier.

use std::fmt;

use crate::snapshot::ResourceKind;

/// Canonical operation identifier for a container API request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    // Global
    /// `ping`
    Ping,
    /// `events`
    Events,
    /// `info`
    Info,
    /// `version`
    Version,

    // Container collection
    /// `containersps`
    ContainersPs,
    /// `containersjson` (list containers)
    ContainersJson,
    /// `containerscreate`
    ContainersCreate,

    // Container item
    /// `containerarchive`
    ContainerArchive,
    /// `containerexport`
    ContainerExport,
    /// `containerimport`
    ContainerImport,
    /// `containerchanges`
    ContainerChanges,
    /// `containerjson` (inspect one container)
    ContainerJson,
    /// `containertop`
    ContainerTop,
    /// `containerlogs`
    ContainerLogs,
    /// `containerstats`
    ContainerStats,
    /// `containerkill`
    ContainerKill,
    /// `containerpause`
    ContainerPause,
    /// `containerunpause`
    ContainerUnpause,
    /// `containerrename`
    ContainerRename,
    /// `containerrestart`
    ContainerRestart,
    /// `containerstart`
    ContainerStart,
    /// `containerstop`
    ContainerStop,
    /// `containerupdate`
    ContainerUpdate,
    /// `containerwait`
    ContainerWait,
    /// `containerresize`
    ContainerResize,
    /// `containerattach`
    ContainerAttach,
    /// `containercopy`
    ContainerCopy,
    /// `containerexec` (create an exec session)
    ContainerExec,
    /// `containerdelete`
    ContainerDelete,

    // Exec sessions
    /// `execstart`
    ExecStart,
    /// `execresize`
    ExecResize,
    /// `execjson`
    ExecJson,

    // Networks
    /// `networkslist`
    NetworksList,
    /// `networkinspect`
    NetworkInspect,
    /// `networkconnect`
    NetworkConnect,
    /// `networkdisconnect`
    NetworkDisconnect,
    /// `networkcreate`
    NetworkCreate,
    /// `networkdelete`
    NetworkDelete,

    // Volumes
    /// `volumeslist`
    VolumesList,
    /// `volumeinspect`
    VolumeInspect,
    /// `volumecreate`
    VolumeCreate,
    /// `volumedelete`
    VolumeDelete,

    // Images
    /// `imagesjson` (list images)
    ImagesJson,
    /// `imagescreate` (pull)
    ImagesCreate,
    /// `imagessearch`
    ImagesSearch,
    /// `imagejson` (inspect one image)
    ImageJson,
    /// `imagehistory`
    ImageHistory,
    /// `imagedelete`
    ImageDelete,

    /// No routing rule matched the request
    Unsupported,
}

impl Command {
    /// Every supported command, in taxonomy order. Excludes [`Command::Unsupported`].
    pub const ALL: &'static [Command] = &[
        Command::Ping,
        Command::Events,
        Command::Info,
        Command::Version,
        Command::ContainersPs,
        Command::ContainersJson,
        Command::ContainersCreate,
        Command::ContainerArchive,
        Command::ContainerExport,
        Command::ContainerImport,
        Command::ContainerChanges,
        Command::ContainerJson,
        Command::ContainerTop,
        Command::ContainerLogs,
        Command::ContainerStats,
        Command::ContainerKill,
        Command::ContainerPause,
        Command::ContainerUnpause,
        Command::ContainerRename,
        Command::ContainerRestart,
        Command::ContainerStart,
        Command::ContainerStop,
        Command::ContainerUpdate,
        Command::ContainerWait,
        Command::ContainerResize,
        Command::ContainerAttach,
        Command::ContainerCopy,
        Command::ContainerExec,
        Command::ContainerDelete,
        Command::ExecStart,
        Command::ExecResize,
        Command::ExecJson,
        Command::NetworksList,
        Command::NetworkInspect,
        Command::NetworkConnect,
        Command::NetworkDisconnect,
        Command::NetworkCreate,
        Command::NetworkDelete,
        Command::VolumesList,
        Command::VolumeInspect,
        Command::VolumeCreate,
        Command::VolumeDelete,
        Command::ImagesJson,
        Command::ImagesCreate,
        Command::ImagesSearch,
        Command::ImageJson,
        Command::ImageHistory,
        Command::ImageDelete,
    ];

    /// Stable string identifier
    pub const fn as_str(&self) -> &'static str {
        match self {
            Command::Ping => "ping",
            Command::Events => "events",
            Command::Info => "info",
            Command::Version => "version",
            Command::ContainersPs => "containersps",
            Command::ContainersJson => "containersjson",
            Command::ContainersCreate => "containerscreate",
            Command::ContainerArchive => "containerarchive",
            Command::ContainerExport => "containerexport",
            Command::ContainerImport => "containerimport",
            Command::ContainerChanges => "containerchanges",
            Command::ContainerJson => "containerjson",
            Command::ContainerTop => "containertop",
            Command::ContainerLogs => "containerlogs",
            Command::ContainerStats => "containerstats",
            Command::ContainerKill => "containerkill",
            Command::ContainerPause => "containerpause",
            Command::ContainerUnpause => "containerunpause",
            Command::ContainerRename => "containerrename",
            Command::ContainerRestart => "containerrestart",
            Command::ContainerStart => "containerstart",
            Command::ContainerStop => "containerstop",
            Command::ContainerUpdate => "containerupdate",
            Command::ContainerWait => "containerwait",
            Command::ContainerResize => "containerresize",
            Command::ContainerAttach => "containerattach",
            Command::ContainerCopy => "containercopy",
            Command::ContainerExec => "containerexec",
            Command::ContainerDelete => "containerdelete",
            Command::ExecStart => "execstart",
            Command::ExecResize => "execresize",
            Command::ExecJson => "execjson",
            Command::NetworksList => "networkslist",
            Command::NetworkInspect => "networkinspect",
            Command::NetworkConnect => "networkconnect",
            Command::NetworkDisconnect => "networkdisconnect",
            Command::NetworkCreate => "networkcreate",
            Command::NetworkDelete => "networkdelete",
            Command::VolumesList => "volumeslist",
            Command::VolumeInspect => "volumeinspect",
            Command::VolumeCreate => "volumecreate",
            Command::VolumeDelete => "volumedelete",
            Command::ImagesJson => "imagesjson",
            Command::ImagesCreate => "imagescreate",
            Command::ImagesSearch => "imagessearch",
            Command::ImageJson => "imagejson",
            Command::ImageHistory => "imagehistory",
            Command::ImageDelete => "imagedelete",
            Command::Unsupported => "unsupported",
        }
    }

    /// Whether a routing rule produced this command
    pub fn is_supported(&self) -> bool {
        *self != Command::Unsupported
    }

    /// Resource kind whose ownership must be verified before this command runs
    ///
    /// Only single-resource commands on containers, networks and exec sessions
    /// are gated. Collection, create and global commands return `None`, as do
    /// volume and image commands (their isolation relies on name scoping).
    pub fn ownership_kind(&self) -> Option<ResourceKind> {
        match self {
            Command::ContainerArchive
            | Command::ContainerExport
            | Command::ContainerImport
            | Command::ContainerChanges
            | Command::ContainerJson
            | Command::ContainerTop
            | Command::ContainerLogs
            | Command::ContainerStats
            | Command::ContainerKill
            | Command::ContainerPause
            | Command::ContainerUnpause
            | Command::ContainerRename
            | Command::ContainerRestart
            | Command::ContainerStart
            | Command::ContainerStop
            | Command::ContainerUpdate
            | Command::ContainerWait
            | Command::ContainerResize
            | Command::ContainerAttach
            | Command::ContainerCopy
            | Command::ContainerExec
            | Command::ContainerDelete => Some(ResourceKind::Container),
            Command::ExecStart | Command::ExecResize | Command::ExecJson => {
                Some(ResourceKind::Exec)
            }
            Command::NetworkInspect
            | Command::NetworkConnect
            | Command::NetworkDisconnect
            | Command::NetworkDelete => Some(ResourceKind::Network),
            _ => None,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
