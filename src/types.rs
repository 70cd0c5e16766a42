/*
 * Shared plain-data types for the filesystem layer: the file-type
 * classification returned by metadata queries, the bitmask form of it used
 * to filter directory listings, and the (name, type) pair produced by typed
 * listings. These types carry no behavior beyond classification and mask
 * arithmetic.
 */
use bitflags::bitflags;

/*
 * Classification of a single filesystem entry as reported by the OS
 * metadata query. `Other` covers everything that is neither a regular file
 * nor a directory (sockets, devices, broken symlinks on platforms that
 * surface them).
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileType {
    Regular,
    Directory,
    Other,
}

bitflags! {
    /// Filter mask over `FileType` used when listing directory entries.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FileTypeMask: u32 {
        const REGULAR = 0b001;
        const DIRECTORY = 0b010;
        const OTHER = 0b100;
    }
}

impl From<FileType> for FileTypeMask {
    fn from(file_type: FileType) -> Self {
        match file_type {
            FileType::Regular => FileTypeMask::REGULAR,
            FileType::Directory => FileTypeMask::DIRECTORY,
            FileType::Other => FileTypeMask::OTHER,
        }
    }
}

impl FileTypeMask {
    /// True when `file_type` is one of the types selected by this mask.
    pub fn matches(self, file_type: FileType) -> bool {
        self.intersects(FileTypeMask::from(file_type))
    }
}

/*
 * One entry of a typed directory listing. The name is relative to the
 * listed directory; the `.` and `..` pseudo-entries are never passed upward
 * by the listing operations.
 */
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypedDirEntry {
    pub name: String,
    pub file_type: FileType,
}

impl TypedDirEntry {
    pub fn new(name: impl Into<String>, file_type: FileType) -> Self {
        TypedDirEntry {
            name: name.into(),
            file_type,
        }
    }
}
