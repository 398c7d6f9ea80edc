// https://wiki.osdev.org/Serial_Ports

use core::{arch::asm, fmt};

pub struct SerialWriter {
    initialized: bool,
}

const IO_BASE: u16 = 0x3f8; // COM1
const RBR: u16 = IO_BASE; // Receiver Buffer Reg (read-only)
const THR: u16 = IO_BASE; // Transmitter Holding Reg (write-only)
const DLL: u16 = IO_BASE; // Divisor Latch Low (while DLAB is set)
const IER: u16 = IO_BASE + 1; // Interrupt Enable Reg
const DLH: u16 = IO_BASE + 1; // Divisor Latch High (while DLAB is set)
const FCR: u16 = IO_BASE + 2; // FIFO Control Reg (write-only)
const LCR: u16 = IO_BASE + 3; // Line Control Register
const MCR: u16 = IO_BASE + 4; // MODEM Control Register
const LSR: u16 = IO_BASE + 5; // Line Status Register (read-only)

const LSR_THR_EMPTY: u8 = 1 << 5;

unsafe fn outb(port: u16, byte: u8) {
    asm!("out dx, al", in("dx") port, in("al") byte, options(nomem, nostack));
}

unsafe fn inb(port: u16) -> u8 {
    let res: u8;
    asm!("in al, dx", in("dx") port, out("al") res, options(nomem, nostack));
    res
}

impl SerialWriter {
    pub const fn new() -> Self {
        Self { initialized: false }
    }

    fn ensure_initialized(&mut self) {
        if self.initialized {
            return;
        }
        // Set first: a failed check panics, and the panic message comes
        // back through here.
        self.initialized = true;

        // SAFETY: Follows the initialization sequence for a 16550 UART.
        unsafe {
            outb(IER, 0x00); // No interrupts, we only ever poll.
            outb(LCR, 0x80); // DLAB on.
            outb(DLL, 0x03); // 38400 baud.
            outb(DLH, 0x00);
            outb(LCR, 0x03); // 8 bits, no parity, one stop bit.
            outb(FCR, 0xC7);
            outb(MCR, 0x0B);

            outb(MCR, 0x1E); // Enable loopback.

            // Confirm that serial is working by writing a byte and reading it
            // back.
            const EXPECTED: u8 = 0xAE;
            outb(THR, EXPECTED);
            let actual = inb(RBR);
            assert!(
                actual == EXPECTED,
                "faulty serial, expected {EXPECTED:#X}, got {actual:#X}"
            );

            outb(MCR, 0x0F); // Disable loopback.
        }
    }
}

impl Default for SerialWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Write for SerialWriter {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.ensure_initialized();

        for b in s.bytes() {
            // SAFETY: Waits for the transmitter to drain before each byte.
            unsafe {
                while inb(LSR) & LSR_THR_EMPTY == 0 {}
                outb(THR, b);
            }
        }

        Ok(())
    }
}

pub static mut SERIAL_WRITER: SerialWriter = SerialWriter::new();
